//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::visibility::Visibility;

/// A post in a user's timeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// The user who created the post.
    pub creator_id: Uuid,
    /// Creator username, present when the query joined the users table.
    #[sqlx(default)]
    pub creator_username: Option<String>,
    /// Post text.
    pub text: Option<String>,
    /// Media references, at most four.
    pub media: Vec<String>,
    /// Who may see the post.
    pub visibility: Visibility,
    /// Monotonic like counter.
    pub likes: i64,
    /// Monotonic comment counter (comments plus replies).
    pub comments: i64,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }
}

/// Data required to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    /// The creating user.
    pub creator_id: Uuid,
    /// Post text, already validated and bounded.
    pub text: Option<String>,
    /// Media references, already capped.
    pub media: Vec<String>,
    /// Visibility level.
    pub visibility: Visibility,
}

/// Data for editing an existing post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdate {
    /// New post text.
    pub text: Option<String>,
    /// New media reference list.
    pub media: Vec<String>,
    /// New visibility level.
    pub visibility: Visibility,
}

/// A post annotated for a specific viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// Whether the viewer has liked this post.
    pub liked: bool,
}
