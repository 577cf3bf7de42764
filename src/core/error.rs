//! Error - Errori del tracker degli inviti
//!
//! Gli errori di rete, di status HTTP e di parsing appartengono tutti alla
//! stessa classe "fetch failure": il poller li conta e li logga senza distinguere.
//! Gli errori delle azioni invece risalgono fino al chiamante.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Errore di trasporto (connessione rifiutata, timeout, TLS...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Il server ha risposto con uno status non di successo
    #[error("unexpected status {status}{}", details_suffix(.details))]
    Status {
        status: StatusCode,
        details: Option<String>,
    },

    /// Body non decodificabile
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// L'invito non è tra i popup visibili, nessuna richiesta inviata
    #[error("invitation {0} is not visible")]
    NotVisible(i64),

    /// Esiste già un'azione in corso per lo stesso invito
    #[error("an action for invitation {0} is already in flight")]
    ActionInFlight(i64),

    /// Configurazione non valida
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn status(status: StatusCode) -> Self {
        Self::Status {
            status,
            details: None,
        }
    }

    pub fn with_details(self, details: impl Into<String>) -> Self {
        match self {
            Self::Status { status, .. } => Self::Status {
                status,
                details: Some(details.into()),
            },
            other => other,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Vero per gli errori che il poller conta come fallimento del fetch
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::Malformed(_)
        )
    }
}

fn details_suffix(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}
