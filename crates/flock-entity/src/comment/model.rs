//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The post this comment belongs to.
    pub post_id: Uuid,
    /// The comment author.
    pub author_id: Uuid,
    /// Author username, present when the query joined the users table.
    #[sqlx(default)]
    pub author_username: Option<String>,
    /// Comment text.
    pub text: String,
    /// Denormalized count of replies under this comment.
    pub reply_count: i64,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Whether `user_id` wrote this comment.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
