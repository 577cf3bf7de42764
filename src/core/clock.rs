//! Clock - Sorgente dell'ora "wall clock" usata per le scadenze
//!
//! Il rate limit del poller usa `tokio::time::Instant`, mentre le scadenze degli
//! inviti sono timestamp assoluti del server: per confrontarli serve un orologio
//! reale, iniettabile nei test.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Orologio di sistema
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
