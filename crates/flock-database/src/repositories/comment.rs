//! Comment repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_entity::comment::Comment;

/// Repository for comment CRUD. Counter updates on the parent post happen
/// in the same transaction as the comment row.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a comment and bump the post's comment counter.
    pub async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> AppResult<Comment> {
        let map = |e| AppError::with_source(ErrorKind::Transient, "Failed to create comment", e);
        let mut tx = self.pool.begin().await.map_err(map)?;

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await
        .map_err(map)?;

        sqlx::query("UPDATE posts SET comments = comments + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(comment)
    }

    /// Find a comment by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to find comment", e))
    }

    /// Replace a comment's text.
    pub async fn update_text(&self, id: Uuid, text: &str) -> AppResult<()> {
        sqlx::query("UPDATE comments SET text = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to update comment", e)
            })?;
        Ok(())
    }

    /// Delete a comment together with its replies and its notifications.
    ///
    /// Post comment counters stay monotonic: deletions do not decrement.
    pub async fn delete_cascade(&self, id: Uuid) -> AppResult<()> {
        let map = |e| AppError::with_source(ErrorKind::Transient, "Failed to delete comment", e);
        let mut tx = self.pool.begin().await.map_err(map)?;

        sqlx::query("DELETE FROM replies WHERE comment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM notifications WHERE (payload->>'comment_id')::uuid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(())
    }

    /// One page of a post's comments, the viewer's own first, then newest.
    pub async fn list_for_post(
        &self,
        post_id: Uuid,
        viewer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT c.*, u.username AS author_username FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY (c.author_id = $2) DESC, c.created_at DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(post_id)
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to list comments", e))
    }

    /// Count a post's comments.
    pub async fn count_for_post(&self, post_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to count comments", e)
            })
    }
}
