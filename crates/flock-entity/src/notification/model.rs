//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::kind::NotificationKind;

/// Entity references carried by a notification.
///
/// Cascade deletion matches on these fields: removing a post deletes every
/// notification whose payload references it, and likewise for comments and
/// replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// The post the event happened on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    /// The comment involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<Uuid>,
    /// The reply involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<Uuid>,
    /// The user whose action produced the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Uuid>,
}

/// A notification fanned out to a set of receivers.
///
/// One record serves every receiver; each receiver acknowledges
/// independently, shrinking the receiver set, and the record is deleted once
/// the set is empty. Records also expire unconditionally at `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// What happened.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// Entity references relevant to the kind.
    pub payload: Json<NotificationPayload>,
    /// Users who have not yet acknowledged this notification.
    pub receivers: Vec<Uuid>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the retention sweep may remove the record regardless of
    /// acknowledgment.
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// Check whether the retention window has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
