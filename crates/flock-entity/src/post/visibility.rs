//! Post visibility levels.

use serde::{Deserialize, Serialize};

/// Who may see a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone.
    Public,
    /// Visible to the creator only.
    Private,
    /// Visible to the creator and their followers.
    Followers,
}

impl Visibility {
    /// Parse a visibility label, falling back to `Public` for anything
    /// unrecognized.
    pub fn parse_or_public(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "private" => Self::Private,
            "followers" => Self::Followers,
            _ => Self::Public,
        }
    }
}
