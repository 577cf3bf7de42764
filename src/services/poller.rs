//! Poller - Fetch periodico degli inviti pendenti
//!
//! `refresh()` è protetto da due condizioni:
//! 1. un solo fetch in volo alla volta (trylock non bloccante)
//! 2. almeno `min_fetch_interval` dall'ultimo *tentativo*
//!
//! Gli errori non vengono mai mostrati all'utente: vengono loggati e contati.

use super::filter::{discard_invalid, filter_snapshot};
use super::tracker::InvitationTracker;
use crate::repositories::InvitationSource;
use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Default)]
pub(crate) struct PollGuard {
    pub(crate) in_flight: bool,
    pub(crate) last_attempt: Option<Instant>,
    pub(crate) consecutive_errors: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Un altro fetch è ancora in corso
    InFlight,
    /// Ultimo tentativo troppo recente
    RateLimited,
}

/// Esito di una chiamata a `refresh()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nessuna richiesta inviata
    Skipped(SkipReason),
    /// Snapshot sostituito
    Updated {
        known: usize,
        new_popups: usize,
        rejected: usize,
    },
    /// Fetch fallito; `halted` è vero oltre la soglia di errori consecutivi
    Failed {
        consecutive_errors: u32,
        halted: bool,
    },
}

/// Rilascia il flag in-flight quando il fetch termina, anche se il task viene cancellato
struct InFlight<'a> {
    guard: &'a Mutex<PollGuard>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight = false;
    }
}

impl<S: InvitationSource> InvitationTracker<S> {
    /// Controlla le guardie e, se passano, registra il tentativo e alza il flag in-flight
    fn begin_fetch(&self) -> Result<InFlight<'_>, SkipReason> {
        let mut guard = self.lock_poll();
        if guard.in_flight {
            return Err(SkipReason::InFlight);
        }
        let now = Instant::now();
        if let Some(last) = guard.last_attempt {
            if now.duration_since(last) < self.options.min_fetch_interval {
                return Err(SkipReason::RateLimited);
            }
        }
        guard.in_flight = true;
        guard.last_attempt = Some(now);
        Ok(InFlight { guard: &self.poll })
    }

    /// Scarica gli inviti pendenti e aggiorna snapshot e popup.
    /// Fire-and-forget dal punto di vista della UI: non fallisce mai
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let _flight = match self.begin_fetch() {
            Ok(flight) => flight,
            Err(reason) => {
                debug!(?reason, "Skipping invitation fetch");
                return RefreshOutcome::Skipped(reason);
            }
        };

        debug!("Fetching pending invitations");
        let result = self.source.fetch_pending().await;

        match result {
            Ok(raw) => {
                let (accepted, rejected) = discard_invalid(raw);
                let now = self.clock.now();

                let (known, new_popups) = {
                    let mut state = self.lock_state();
                    let outcome = filter_snapshot(accepted, now, &state.processed, &state.shown);
                    let known = outcome.valid.len();
                    let added = state.apply_snapshot(outcome.valid, outcome.fresh);
                    if added > 0 {
                        self.publish(&state);
                    }
                    (known, added)
                };

                self.lock_poll().consecutive_errors = 0;

                if new_popups > 0 {
                    info!("Showing {} new invitations", new_popups);
                }
                debug!(known, rejected, "Invitation snapshot updated");
                RefreshOutcome::Updated {
                    known,
                    new_popups,
                    rejected,
                }
            }
            Err(e) => {
                let consecutive_errors = {
                    let mut guard = self.lock_poll();
                    guard.consecutive_errors += 1;
                    guard.consecutive_errors
                };
                error!("Failed to fetch invitations: {}", e);

                let halted = consecutive_errors > self.options.max_consecutive_errors;
                if halted {
                    // salta solo il resto di questo ciclo, il timer esterno continua
                    warn!(
                        "Too many errors fetching invitations ({}), stopping polling temporarily",
                        consecutive_errors
                    );
                }
                RefreshOutcome::Failed {
                    consecutive_errors,
                    halted,
                }
            }
        }
    }
}
