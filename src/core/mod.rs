//! Core Module - Componenti infrastrutturali del tracker
//!
//! Questo modulo contiene tutti i componenti "core":
//! - Configurazione
//! - Gestione errori
//! - Orologio iniettabile
//! - Stato client-side degli inviti

pub mod clock;
pub mod config;
pub mod error;
pub(crate) mod state;

// Re-exports per facilitare l'import
pub use clock::{Clock, SystemClock};
pub use config::{Config, TrackerOptions};
pub use error::TrackerError;
pub(crate) use state::TrackerState;
