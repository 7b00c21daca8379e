//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user.
///
/// Follow edges and the hidden-user relation live in their own tables and
/// are reached through the social graph repository, not through this struct.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name, stored lowercase.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile bio text.
    pub bio: Option<String>,
    /// Whether the account's email address has been confirmed.
    pub verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Minimal user projection embedded in listings (comments, histories,
/// visitor logs).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
}
