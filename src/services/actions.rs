//! Action Handler - Accept/decline e chiusura dei popup
//!
//! Ogni invito viene processato al più una volta: una seconda azione sullo stesso
//! id mentre la prima è in volo viene rifiutata senza inviare nulla.

use super::tracker::InvitationTracker;
use crate::core::TrackerError;
use crate::entities::Decision;
use crate::repositories::InvitationSource;
use dashmap::DashSet;
use tracing::{debug, error, info, instrument, warn};

/// Prenotazione dell'id nel set delle azioni in corso, rilasciata al drop
struct ActionFlight<'a> {
    set: &'a DashSet<i64>,
    id: i64,
}

impl<'a> ActionFlight<'a> {
    fn begin(set: &'a DashSet<i64>, id: i64) -> Option<Self> {
        set.insert(id).then_some(Self { set, id })
    }
}

impl Drop for ActionFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

impl<S: InvitationSource> InvitationTracker<S> {
    /// Applica la decisione dell'utente a un invito visibile
    ///
    /// # Returns
    /// * `Ok(())` - il server ha confermato: invito processato e rimosso dai popup
    /// * `Err(TrackerError::NotVisible)` - l'invito non è (più) visibile
    /// * `Err(TrackerError::ActionInFlight)` - un'altra azione sullo stesso invito è in corso
    /// * `Err(_)` - la richiesta è fallita, il popup resta visibile con l'errore
    #[instrument(skip(self), fields(invite_id = %id, action = %decision))]
    pub async fn act(&self, id: i64, decision: Decision) -> Result<(), TrackerError> {
        let _flight = ActionFlight::begin(&self.actions_in_flight, id).ok_or_else(|| {
            warn!("Action already in flight for invitation {}", id);
            TrackerError::ActionInFlight(id)
        })?;

        let visible = self.lock_state().is_visible(id);
        if !visible {
            warn!("Invitation {} is not visible, nothing to do", id);
            return Err(TrackerError::NotVisible(id));
        }

        debug!("Submitting decision");
        let result = self.source.respond(id, decision).await;

        match result {
            Ok(()) => {
                {
                    let mut state = self.lock_state();
                    state.mark_processed(id);
                    self.publish(&state);
                }
                match decision {
                    Decision::Accept => info!("Invitation accepted!"),
                    Decision::Decline => info!("Invitation declined!"),
                }
                if let Some(callback) = &self.on_action {
                    callback(id, decision);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to {} invitation {}: {}", decision, id, e);
                {
                    let mut state = self.lock_state();
                    if state.is_visible(id) {
                        state.action_failures.insert(id, e.to_string());
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn accept(&self, id: i64) -> Result<(), TrackerError> {
        self.act(id, Decision::Accept).await
    }

    pub async fn decline(&self, id: i64) -> Result<(), TrackerError> {
        self.act(id, Decision::Decline).await
    }

    /// Chiude il popup senza rispondere. L'invito non verrà più mostrato
    #[instrument(skip(self), fields(invite_id = %id))]
    pub fn dismiss(&self, id: i64) -> bool {
        let mut state = self.lock_state();
        let removed = state.dismiss(id);
        if removed {
            self.publish(&state);
            debug!("Invitation popup dismissed");
        }
        removed
    }
}
