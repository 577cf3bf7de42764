//! Invitation Tracker - Stato condiviso e punto di accesso del componente
//!
//! Contiene la sorgente degli inviti, lo stato client-side e il canale con cui
//! vengono pubblicate le modifiche alla lista dei popup. Le operazioni vere e
//! proprie sono divise nei moduli `poller`, `actions`, `sweeper` e `scheduler`.

use super::poller::PollGuard;
use super::scheduler::TaskHandle;
use crate::core::{Clock, Config, SystemClock, TrackerError, TrackerOptions, TrackerState};
use crate::dtos::PopupDTO;
use crate::entities::{Decision, Invitation};
use crate::repositories::{HttpInvitationRepository, InvitationSource};
use dashmap::DashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Callback invocata dopo ogni accept/decline andato a buon fine
pub type OnAction = Arc<dyn Fn(i64, Decision) + Send + Sync>;

pub struct InvitationTracker<S> {
    /// Backend da cui leggere gli inviti e a cui inviare le decisioni
    pub(crate) source: S,

    pub(crate) options: TrackerOptions,

    /// Orologio per le scadenze
    pub(crate) clock: Arc<dyn Clock>,

    /// Snapshot, popup visibili, id mostrati e processati
    pub(crate) state: Mutex<TrackerState>,

    /// Flag in-flight, ultimo tentativo e contatore errori del poller
    pub(crate) poll: Mutex<PollGuard>,

    /// Id con un'azione in corso (single-flight per invito)
    pub(crate) actions_in_flight: DashSet<i64>,

    pub(crate) on_action: Option<OnAction>,

    /// Ultima lista di popup pubblicata
    pub(crate) popups_tx: watch::Sender<Vec<Invitation>>,
}

impl<S: InvitationSource> InvitationTracker<S> {
    pub fn new(source: S, options: TrackerOptions) -> Self {
        let (popups_tx, _) = watch::channel(Vec::new());
        Self {
            source,
            options,
            clock: Arc::new(SystemClock),
            state: Mutex::new(TrackerState::new()),
            poll: Mutex::new(PollGuard::default()),
            actions_in_flight: DashSet::new(),
            on_action: None,
            popups_tx,
        }
    }

    pub fn with_on_action<F>(mut self, callback: F) -> Self
    where
        F: Fn(i64, Decision) + Send + Sync + 'static,
    {
        self.on_action = Some(Arc::new(callback));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_poll(&self) -> MutexGuard<'_, PollGuard> {
        self.poll.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pubblica la lista dei popup solo se è cambiata rispetto all'ultima inviata
    pub(crate) fn publish(&self, state: &TrackerState) {
        self.popups_tx.send_if_modified(|current| {
            if *current == state.visible {
                return false;
            }
            *current = state.visible.clone();
            true
        });
    }

    // ********************* LETTURA STATO **********************//

    /// Popup visibili, nell'ordine di scoperta
    pub fn visible_popups(&self) -> Vec<Invitation> {
        self.lock_state().visible.clone()
    }

    /// View model dei popup visibili
    pub fn popups(&self) -> Vec<PopupDTO> {
        let now = self.clock.now();
        let state = self.lock_state();
        state
            .visible
            .iter()
            .map(|inv| PopupDTO::from_invitation(inv, now, state.action_failures.get(&inv.id).cloned()))
            .collect()
    }

    /// Snapshot dell'ultimo fetch riuscito, ordinato per id
    pub fn known_invitations(&self) -> Vec<Invitation> {
        self.lock_state().known.values().cloned().collect()
    }

    pub fn was_shown(&self, id: i64) -> bool {
        self.lock_state().shown.contains(&id)
    }

    pub fn is_processed(&self, id: i64) -> bool {
        self.lock_state().processed.contains(&id)
    }

    pub fn action_failure(&self, id: i64) -> Option<String> {
        self.lock_state().action_failures.get(&id).cloned()
    }

    /// Nessun popup da disegnare
    pub fn is_empty(&self) -> bool {
        self.lock_state().visible.is_empty()
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.lock_poll().consecutive_errors
    }

    /// Vero mentre un fetch è in corso
    pub fn is_loading(&self) -> bool {
        self.lock_poll().in_flight
    }

    // ********************* NOTIFICHE **********************//

    /// Receiver con la lista corrente dei popup, aggiornato a ogni modifica.
    /// Non tenere il `Ref` di `borrow()` mentre si chiamano metodi del tracker
    pub fn watch(&self) -> watch::Receiver<Vec<Invitation>> {
        self.popups_tx.subscribe()
    }

    /// Registra una callback chiamata subito con la lista corrente e poi a ogni modifica.
    /// La sottoscrizione termina quando l'handle ritornato viene droppato
    pub fn subscribe<F>(&self, callback: F) -> TaskHandle
    where
        F: Fn(&[Invitation]) + Send + 'static,
    {
        let mut rx = self.popups_tx.subscribe();
        TaskHandle::spawn("popup-subscriber", async move {
            loop {
                // copia e rilascia il lock del canale prima della callback:
                // la callback può richiamare il tracker (dismiss, act, popups...)
                let popups = rx.borrow_and_update().clone();
                callback(&popups);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

impl InvitationTracker<HttpInvitationRepository> {
    /// Crea un tracker che parla HTTP con il backend configurato
    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let source = HttpInvitationRepository::new(
            &config.api_url,
            &config.auth_token,
            config.request_timeout,
        )?;
        Ok(Self::new(source, config.tracker.clone()))
    }
}
