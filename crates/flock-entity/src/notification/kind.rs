//! Notification kind tags.

use serde::{Deserialize, Serialize};

/// The action that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A post mentioned the receiver's timeline via `@followers`.
    Mention,
    /// Someone commented on the receiver's post.
    Comment,
    /// Someone replied under a comment the receiver is involved in.
    Reply,
}
