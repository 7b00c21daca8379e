//! Reply entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A reply attached to exactly one comment of one post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reply {
    /// Unique reply identifier.
    pub id: Uuid,
    /// The comment this reply answers.
    pub comment_id: Uuid,
    /// The post the parent comment belongs to.
    pub post_id: Uuid,
    /// The reply author.
    pub author_id: Uuid,
    /// Author username, present when the query joined the users table.
    #[sqlx(default)]
    pub author_username: Option<String>,
    /// Reply text.
    pub text: String,
    /// When the reply was created.
    pub created_at: DateTime<Utc>,
    /// When the reply was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Reply {
    /// Whether `user_id` wrote this reply.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
