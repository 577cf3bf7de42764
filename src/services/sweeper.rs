//! Expiry Sweeper - Rimozione dei popup scaduti senza passare dal server

use super::tracker::InvitationTracker;
use crate::repositories::InvitationSource;
use tracing::{info, instrument};

impl<S: InvitationSource> InvitationTracker<S> {
    /// Tiene solo i popup con `expires_at > now`.
    /// `shown` e `processed` non vengono toccati: un invito scaduto non riappare
    #[instrument(skip(self))]
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock_state();
        let removed = state.retain_live(now);
        if removed > 0 {
            self.publish(&state);
            info!("Removed {} expired invitation popups", removed);
        }
        removed
    }
}
