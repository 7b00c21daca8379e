//! Notification repository implementation.
//!
//! One row fans out to many receivers (`receivers uuid[]`). Receivers
//! acknowledge independently; the row is garbage-collected when its
//! receiver set empties, and the retention sweep removes rows past
//! `expires_at` regardless of acknowledgment.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_entity::notification::{Notification, NotificationKind, NotificationPayload};

/// Repository for multi-receiver notification records.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one record carrying the full receiver set.
    pub async fn create(
        &self,
        kind: NotificationKind,
        message: &str,
        payload: &NotificationPayload,
        receivers: &[Uuid],
        expires_at: DateTime<Utc>,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (kind, message, payload, receivers, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(kind)
        .bind(message)
        .bind(Json(payload))
        .bind(receivers)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Transient, "Failed to create notification", e)
        })
    }

    /// Latest unexpired notifications addressed to a receiver.
    pub async fn find_for_receiver(
        &self,
        receiver_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE $1 = ANY(receivers) AND expires_at > NOW() \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(receiver_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Transient, "Failed to list notifications", e)
        })
    }

    /// Remove one receiver from a record; delete the record once the
    /// receiver set is empty. Both steps share a transaction.
    pub async fn remove_receiver(&self, notification_id: Uuid, receiver_id: Uuid) -> AppResult<()> {
        let map = |e| {
            AppError::with_source(ErrorKind::Transient, "Failed to acknowledge notification", e)
        };
        let mut tx = self.pool.begin().await.map_err(map)?;

        let remaining: Option<Vec<Uuid>> = sqlx::query_scalar(
            "UPDATE notifications SET receivers = array_remove(receivers, $2) \
             WHERE id = $1 RETURNING receivers",
        )
        .bind(notification_id)
        .bind(receiver_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map)?;

        let remaining = match remaining {
            Some(r) => r,
            None => return Err(AppError::not_found("Notification not found")),
        };

        if remaining.is_empty() {
            sqlx::query("DELETE FROM notifications WHERE id = $1")
                .bind(notification_id)
                .execute(&mut *tx)
                .await
                .map_err(map)?;
        }

        tx.commit().await.map_err(map)?;
        Ok(())
    }

    /// Remove every record past its retention window. Returns the purge
    /// count.
    pub async fn delete_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Transient,
                    "Failed to purge expired notifications",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }
}
