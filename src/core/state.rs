//! Tracker State - Stato client-side degli inviti
//!
//! Insiemi effimeri, per istanza di tracker, senza persistenza:
//! snapshot corrente, popup visibili, id già mostrati e id già processati.

use crate::entities::Invitation;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct TrackerState {
    /// Snapshot valido dell'ultimo fetch riuscito (id -> invito)
    pub(crate) known: BTreeMap<i64, Invitation>,

    /// Popup visibili, in ordine di scoperta. Un id compare al più una volta
    pub(crate) visible: Vec<Invitation>,

    /// Id mai aggiunti ai popup: impediscono di rimostrare un invito chiuso
    pub(crate) shown: HashSet<i64>,

    /// Id accettati/rifiutati: un fetch successivo non li fa risorgere
    pub(crate) processed: HashSet<i64>,

    /// Ultimo errore di azione per popup, da mostrare all'utente
    pub(crate) action_failures: HashMap<i64, String>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, id: i64) -> bool {
        self.visible.iter().any(|inv| inv.id == id)
    }

    /// Sostituisce lo snapshot e accoda i nuovi popup.
    /// Ritorna il numero di popup aggiunti
    pub fn apply_snapshot(&mut self, valid: Vec<Invitation>, fresh: Vec<Invitation>) -> usize {
        self.known = valid.into_iter().map(|inv| (inv.id, inv)).collect();

        let mut added = 0;
        for inv in fresh {
            // shown è la fonte di verità per la novità: mai due volte lo stesso id
            if self.shown.insert(inv.id) {
                self.visible.push(inv);
                added += 1;
            }
        }
        added
    }

    /// Registra un'azione andata a buon fine
    pub fn mark_processed(&mut self, id: i64) {
        self.processed.insert(id);
        self.visible.retain(|inv| inv.id != id);
        self.known.remove(&id);
        self.action_failures.remove(&id);
    }

    /// Chiude il popup senza toccare `shown`. Ritorna true se era visibile
    pub fn dismiss(&mut self, id: i64) -> bool {
        let before = self.visible.len();
        self.visible.retain(|inv| inv.id != id);
        self.action_failures.remove(&id);
        self.visible.len() != before
    }

    /// Rimuove i popup scaduti. Ritorna quanti ne sono stati rimossi
    pub fn retain_live(&mut self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let before = self.visible.len();
        self.visible.retain(|inv| inv.is_live_at(now));
        let removed = before - self.visible.len();
        if removed > 0 {
            let visible: HashSet<i64> = self.visible.iter().map(|inv| inv.id).collect();
            self.action_failures.retain(|id, _| visible.contains(id));
        }
        removed
    }
}
