//! Invitation DTOs - Data Transfer Objects per inviti

use crate::entities::{GroupRole, Invitation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope della risposta di `GET /invitations`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InvitationListDTO {
    #[serde(default)]
    pub data: Vec<Invitation>,
}

/// Dati di presentazione di un popup, indipendenti dalla tecnologia di rendering
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PopupDTO {
    pub invitation_id: i64,
    pub title: String,
    pub subtitle: String,
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_description: Option<String>,
    pub role: GroupRole,
    pub minutes_left: i64,
    pub expires_label: String,
    /// Ultimo errore di accept/decline, da mostrare sul popup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl PopupDTO {
    pub fn from_invitation(inv: &Invitation, now: DateTime<Utc>, failure: Option<String>) -> Self {
        let minutes_left = inv.minutes_left(now);
        Self {
            invitation_id: inv.id,
            title: "Group Invitation".to_string(),
            subtitle: format!("{} invited you to join", inv.inviter_username),
            group_name: inv.group_name.clone(),
            group_description: Some(inv.group_description.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            role: inv.role,
            minutes_left,
            expires_label: format!("Expires in {} minutes", minutes_left),
            failure,
        }
    }
}
