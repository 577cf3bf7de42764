//! Dedup / Filter Engine - Da snapshot grezzo a nuovi popup
//!
//! Funzioni pure, senza I/O: dato lo snapshot del server, l'ora corrente e gli
//! insiemi `processed`/`shown`, calcolano lo snapshot valido e i popup da aggiungere.

use crate::entities::Invitation;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::warn;
use validator::Validate;

/// Risultato di un passaggio del filtro
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Inviti non scaduti e non processati: diventano lo snapshot
    pub valid: Vec<Invitation>,
    /// Sottoinsieme di `valid` mai mostrato, nell'ordine di arrivo
    pub fresh: Vec<Invitation>,
}

/// Scarta i record che violano i vincoli dell'entità (id, nome gruppo, finestra di scadenza).
/// Ritorna i record buoni e il numero di quelli scartati
pub fn discard_invalid(raw: Vec<Invitation>) -> (Vec<Invitation>, usize) {
    let mut rejected = 0;
    let accepted = raw
        .into_iter()
        .filter(|inv| match inv.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(invite_id = inv.id, "Discarding malformed invitation: {}", e);
                rejected += 1;
                false
            }
        })
        .collect();
    (accepted, rejected)
}

/// Step 1 (validità) + step 2 (novità).
/// Un id duplicato nella stessa risposta viene considerato una volta sola
pub fn filter_snapshot(
    raw: Vec<Invitation>,
    now: DateTime<Utc>,
    processed: &HashSet<i64>,
    shown: &HashSet<i64>,
) -> FilterOutcome {
    let mut seen = HashSet::new();
    let mut outcome = FilterOutcome::default();

    for inv in raw {
        if !inv.is_live_at(now) || processed.contains(&inv.id) {
            continue;
        }
        if !seen.insert(inv.id) {
            continue;
        }
        if !shown.contains(&inv.id) {
            outcome.fresh.push(inv.clone());
        }
        outcome.valid.push(inv);
    }

    outcome
}
