//! Request context carrying the authenticated actor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flock_entity::user::User;

/// Context for the current authenticated request.
///
/// Resolved by the external identity layer and passed into service methods
/// so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username (convenience field for messages).
    pub username: String,
    /// Whether the account's email address has been confirmed.
    pub verified: bool,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, username: impl Into<String>, verified: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            verified,
        }
    }

    /// Build a context from a loaded user entity.
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.verified)
    }
}
