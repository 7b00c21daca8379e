//! Reply repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_entity::reply::Reply;

/// Repository for reply CRUD. Counter updates on the parent comment and
/// post happen in the same transaction as the reply row.
#[derive(Debug, Clone)]
pub struct ReplyRepository {
    pool: PgPool,
}

impl ReplyRepository {
    /// Create a new reply repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reply, bumping the parent comment's reply counter and the
    /// post's comment counter.
    pub async fn create(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> AppResult<Reply> {
        let map = |e| AppError::with_source(ErrorKind::Transient, "Failed to create reply", e);
        let mut tx = self.pool.begin().await.map_err(map)?;

        let reply = sqlx::query_as::<_, Reply>(
            "INSERT INTO replies (comment_id, post_id, author_id, text) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(comment_id)
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await
        .map_err(map)?;

        sqlx::query("UPDATE comments SET reply_count = reply_count + 1 WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("UPDATE posts SET comments = comments + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(reply)
    }

    /// Find a reply by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reply>> {
        sqlx::query_as::<_, Reply>("SELECT * FROM replies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to find reply", e))
    }

    /// Replace a reply's text.
    pub async fn update_text(&self, id: Uuid, text: &str) -> AppResult<()> {
        sqlx::query("UPDATE replies SET text = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to update reply", e))?;
        Ok(())
    }

    /// Delete a reply and its notification.
    pub async fn delete_cascade(&self, id: Uuid) -> AppResult<()> {
        let map = |e| AppError::with_source(ErrorKind::Transient, "Failed to delete reply", e);
        let mut tx = self.pool.begin().await.map_err(map)?;

        sqlx::query("DELETE FROM notifications WHERE (payload->>'reply_id')::uuid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(())
    }

    /// One page of a comment's replies. Replies from `priority_ids`
    /// (the viewer and the post creator) sort first, then newest.
    pub async fn list_for_comment(
        &self,
        comment_id: Uuid,
        priority_ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Reply>> {
        sqlx::query_as::<_, Reply>(
            "SELECT r.*, u.username AS author_username FROM replies r \
             JOIN users u ON u.id = r.author_id \
             WHERE r.comment_id = $1 \
             ORDER BY (r.author_id = ANY($2)) DESC, r.created_at DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(comment_id)
        .bind(priority_ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to list replies", e))
    }

    /// Count a comment's replies.
    pub async fn count_for_comment(&self, comment_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM replies WHERE comment_id = $1")
            .bind(comment_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to count replies", e))
    }
}
