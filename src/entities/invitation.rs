//! Invitation entity - Entità invito ricevuta dal backend

use super::enums::{GroupRole, InvitationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_expiry_window"))]
pub struct Invitation {
    #[validate(range(min = 1, message = "Invitation id must be positive"))]
    pub id: i64,
    pub group_id: i64, // gruppo in cui si viene invitati
    #[validate(length(min = 1, message = "Group name must not be empty"))]
    pub group_name: String,
    #[serde(default)]
    pub group_description: String,
    pub inviter_username: String, // utente che invita
    #[serde(default)]
    pub role: GroupRole,
    #[serde(default)]
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Un invito è valido finché `expires_at` è strettamente successivo a `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Minuti interi mancanti alla scadenza, mai negativi
    pub fn minutes_left(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_minutes().max(0)
    }
}

fn validate_expiry_window(invitation: &Invitation) -> Result<(), ValidationError> {
    if invitation.expires_at <= invitation.created_at {
        let mut err = ValidationError::new("expiry_window");
        err.message = Some("expires_at must be after created_at".into());
        return Err(err);
    }
    Ok(())
}
