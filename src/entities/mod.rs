//! Entities module - Entità del dominio
//!
//! Questo modulo contiene le entità ricevute dal backend degli inviti.
//! Sono read-only lato client: vengono create al fetch e rimosse, mai modificate.

pub mod enums;
pub mod invitation;

// Re-exports per facilitare l'import
pub use enums::{Decision, GroupRole, InvitationStatus};
pub use invitation::Invitation;
