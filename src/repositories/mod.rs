//! Repositories module - Accesso al backend degli inviti
//!
//! Il tracker dipende solo dal trait `InvitationSource`; l'implementazione HTTP
//! è una delle possibili (i test usano sorgenti in memoria).

pub mod invitation;
pub mod traits;

// Re-esportazione del trait per facilitare l'import
pub use traits::InvitationSource;

pub use invitation::HttpInvitationRepository;
