//! HttpInvitationRepository - Accesso HTTP al backend degli inviti

use super::InvitationSource;
use crate::core::TrackerError;
use crate::dtos::InvitationListDTO;
use crate::entities::{Decision, Invitation};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

//INVITATION REPOSITORY
pub struct HttpInvitationRepository {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpInvitationRepository {
    /// Crea il repository con un client dedicato
    ///
    /// # Arguments
    /// * `base_url` - URL base delle API (es. `http://localhost:8080/api`)
    /// * `token` - Bearer token dell'utente
    /// * `timeout` - Timeout di ogni singola richiesta
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trasforma gli status non di successo in errore, includendo il body nei dettagli
    async fn ensure_success(response: Response) -> Result<Response, TrackerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = TrackerError::status(status);
        Err(if body.is_empty() { err } else { err.with_details(body) })
    }
}

impl InvitationSource for HttpInvitationRepository {
    #[instrument(skip(self))]
    async fn fetch_pending(&self) -> Result<Vec<Invitation>, TrackerError> {
        let response = self
            .client
            .get(self.url("/invitations"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        // parsing con serde_json per distinguere il body malformato dall'errore di rete
        let bytes = response.bytes().await?;
        let list: InvitationListDTO = serde_json::from_slice(&bytes)?;
        debug!("Fetched {} invitations", list.data.len());
        Ok(list.data)
    }

    #[instrument(skip(self), fields(invite_id = %id, action = %decision))]
    async fn respond(&self, id: i64, decision: Decision) -> Result<(), TrackerError> {
        let path = format!("/invitations/{}/{}", id, decision.as_path());
        let response = self
            .client
            .post(self.url(&path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        // il body non ha significato oltre lo status
        let body = response.text().await.unwrap_or_default();
        debug!("Response body: {}", body);
        Ok(())
    }
}
