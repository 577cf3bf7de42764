//! Scheduler - Task periodici del tracker
//!
//! Poller e sweeper girano come due task tokio indipendenti. Ogni task è legato a
//! un `TaskHandle`: quando l'handle viene droppato (o cancellato) il task viene
//! abortito, così nessuno aggiorna lo stato dopo lo smontaggio della vista.

use super::tracker::InvitationTracker;
use crate::repositories::InvitationSource;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Handle di un task in background, abortito al drop
pub struct TaskHandle {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn spawn<F>(name: &'static str, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(task = name, "Spawning background task");
        Self {
            name,
            handle: Some(tokio::spawn(task)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancella il task. Equivalente a droppare l'handle
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = self.name, "Background task cancelled");
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Handle dei due task del tracker (poll e sweep)
pub struct TrackerHandle {
    poll: TaskHandle,
    sweep: TaskHandle,
}

impl TrackerHandle {
    pub fn is_running(&self) -> bool {
        !self.poll.is_finished() && !self.sweep.is_finished()
    }

    /// Ferma entrambi i task
    pub fn shutdown(self) {
        info!("Stopping invitation tracker");
        let Self { poll, sweep } = self;
        poll.cancel();
        sweep.cancel();
    }
}

impl<S: InvitationSource> InvitationTracker<S> {
    /// Avvia il polling (subito, poi ogni `poll_interval`) e lo sweeper
    /// (ogni `sweep_interval`). I task vivono finché vive l'handle ritornato
    pub fn start(self: &Arc<Self>) -> TrackerHandle {
        info!(
            "Starting invitation tracker: poll every {}s, sweep every {}s",
            self.options.poll_interval.as_secs(),
            self.options.sweep_interval.as_secs()
        );

        let poller = Arc::clone(self);
        let poll = TaskHandle::spawn("invitation-poller", async move {
            let mut interval = time::interval(poller.options.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // il primo tick è immediato: fetch iniziale
                interval.tick().await;
                poller.refresh().await;
            }
        });

        let sweeper = Arc::clone(self);
        let sweep = TaskHandle::spawn("invitation-sweeper", async move {
            let mut interval = time::interval(sweeper.options.sweep_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Salta il primo tick che avviene immediatamente
            interval.tick().await;

            loop {
                interval.tick().await;
                sweeper.sweep();
            }
        });

        TrackerHandle { poll, sweep }
    }
}
