//! Multi-receiver notification fan-out.
//!
//! Persist-then-notify: the durable record is the side effect callers rely
//! on, and its failure surfaces. The live push to connected receivers is a
//! separate best-effort step that can never roll back or delay the write.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use flock_core::config::limits::LimitsConfig;
use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_database::repositories::notification::NotificationRepository;
use flock_entity::notification::{Notification, NotificationKind, NotificationPayload};
use flock_realtime::{LiveEvent, PresenceRegistry};

/// Creates notification records and pushes live copies to connected
/// receivers.
#[derive(Debug, Clone)]
pub struct NotificationFanout {
    /// Notification repository.
    repo: Arc<NotificationRepository>,
    /// Presence registry for live delivery.
    presence: Arc<PresenceRegistry>,
    /// Days a record is retained before the sweep removes it.
    retention_days: i64,
    /// Records returned per poll.
    list_limit: i64,
}

impl NotificationFanout {
    /// Create a new fan-out service.
    pub fn new(
        repo: Arc<NotificationRepository>,
        presence: Arc<PresenceRegistry>,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            repo,
            presence,
            retention_days: limits.notification_retention_days,
            list_limit: limits.notification_list_limit,
        }
    }

    /// Persist one record for the whole receiver set, then push a live
    /// copy to each receiver that is currently connected.
    pub async fn create_and_dispatch(
        &self,
        kind: NotificationKind,
        message: String,
        payload: NotificationPayload,
        receivers: Vec<Uuid>,
    ) -> AppResult<Notification> {
        let mut receivers = receivers;
        receivers.sort_unstable();
        receivers.dedup();
        if receivers.is_empty() {
            return Err(AppError::validation(
                "A notification needs at least one receiver",
            ));
        }

        let expires_at = Utc::now() + Duration::days(self.retention_days);
        let notification = self
            .repo
            .create(kind, &message, &payload, &receivers, expires_at)
            .await?;

        let event = LiveEvent::Notification {
            kind,
            message,
            payload,
        };
        let mut delivered = 0usize;
        for receiver in &receivers {
            if let Some(conn) = self.presence.lookup(*receiver) {
                if conn.send(&event) {
                    delivered += 1;
                }
            }
        }
        debug!(
            id = %notification.id,
            receivers = receivers.len(),
            delivered,
            "Notification dispatched"
        );

        Ok(notification)
    }

    /// Acknowledge a notification for one receiver. The record is deleted
    /// once its receiver set empties; until then other receivers still see
    /// it.
    pub async fn acknowledge(&self, notification_id: Uuid, receiver_id: Uuid) -> AppResult<()> {
        self.repo.remove_receiver(notification_id, receiver_id).await
    }

    /// Latest unexpired notifications for a receiver.
    pub async fn list_for(&self, receiver_id: Uuid) -> AppResult<Vec<Notification>> {
        self.repo.find_for_receiver(receiver_id, self.list_limit).await
    }
}
