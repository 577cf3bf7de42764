//! Invitation tracker library - notifiche degli inviti ai gruppi
//!
//! Polling degli inviti pendenti, dedup lato client, popup transitori e
//! accept/decline processati una sola volta per invito.

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{Clock, Config, SystemClock, TrackerError, TrackerOptions};
pub use entities::{Decision, Invitation};
pub use repositories::{HttpInvitationRepository, InvitationSource};
pub use services::{InvitationTracker, RefreshOutcome, SkipReason, TaskHandle, TrackerHandle};

use tracing_subscriber::EnvFilter;

/// Inizializza il logging; `RUST_LOG` ha la precedenza sul default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("invitation_tracker=info"));
    // ignora l'errore se un subscriber è già installato (es. nei test)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
