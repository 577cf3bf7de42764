//! Services module - Componenti del tracker degli inviti
//!
//! - `filter`: motore di dedup/filtro, puro
//! - `poller`: fetch con single-flight, rate limit e contatore errori
//! - `actions`: accept/decline single-flight per id e dismiss
//! - `sweeper`: rimozione dei popup scaduti
//! - `scheduler`: task periodici cancellabili
//! - `tracker`: stato condiviso e notifiche

pub mod actions;
pub mod filter;
pub mod poller;
pub mod scheduler;
pub mod sweeper;
pub mod tracker;

// Re-exports per facilitare l'import
pub use filter::{FilterOutcome, discard_invalid, filter_snapshot};
pub use poller::{RefreshOutcome, SkipReason};
pub use scheduler::{TaskHandle, TrackerHandle};
pub use tracker::{InvitationTracker, OnAction};
