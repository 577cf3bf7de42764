//! Common source traits
//!
//! This module defines the interface the tracker uses to talk to the invitation backend.

use crate::core::TrackerError;
use crate::entities::{Decision, Invitation};
use std::future::Future;
use std::sync::Arc;

/// Trait for the backend that owns the invitations
///
/// The futures must be `Send`: the tracker drives them from tasks spawned on the
/// tokio runtime.
pub trait InvitationSource: Send + Sync + 'static {
    /// Fetches the pending invitations of the authenticated user
    ///
    /// # Returns
    /// * `Ok(Vec<Invitation>)` - Raw snapshot as returned by the server (can be empty)
    /// * `Err(TrackerError)` - Network error, non-success status or malformed body
    fn fetch_pending(&self) -> impl Future<Output = Result<Vec<Invitation>, TrackerError>> + Send;

    /// Submits the user's decision for one invitation
    ///
    /// # Arguments
    /// * `id` - Invitation id
    /// * `decision` - Accept or decline
    ///
    /// # Returns
    /// * `Ok(())` - The server acknowledged the decision
    /// * `Err(TrackerError)` - The decision was not applied
    fn respond(
        &self,
        id: i64,
        decision: Decision,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;
}

/// A shared source is still a source
impl<T: InvitationSource> InvitationSource for Arc<T> {
    fn fetch_pending(&self) -> impl Future<Output = Result<Vec<Invitation>, TrackerError>> + Send {
        (**self).fetch_pending()
    }

    fn respond(
        &self,
        id: i64,
        decision: Decision,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send {
        (**self).respond(id, decision)
    }
}
