//! Social graph repository: follow edges and the hidden-user relation.
//!
//! Both sides of a follow edge are stored (`user_following` and
//! `user_followers`). Every edge mutation writes the two tables inside one
//! transaction; either both sides commit or neither does.

use sqlx::PgPool;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;

/// Repository for the bidirectional follow relationship and the
/// unilateral hidden-user relation.
#[derive(Debug, Clone)]
pub struct SocialGraphRepository {
    pool: PgPool,
}

impl SocialGraphRepository {
    /// Create a new social graph repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_tx_err(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::conflict("Follow edge already exists");
            }
        }
        AppError::with_source(ErrorKind::Transient, "Follow edge transaction failed", e)
    }

    /// Insert both sides of a follow edge atomically.
    pub async fn insert_edge(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(Self::map_tx_err)?;

        sqlx::query("INSERT INTO user_following (user_id, target_id) VALUES ($1, $2)")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_tx_err)?;

        sqlx::query("INSERT INTO user_followers (user_id, follower_id) VALUES ($1, $2)")
            .bind(followee_id)
            .bind(follower_id)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_tx_err)?;

        tx.commit().await.map_err(Self::map_tx_err)?;
        Ok(())
    }

    /// Delete both sides of a follow edge atomically.
    ///
    /// Returns `NotFound` when the edge does not exist; an incomplete edge
    /// (one side present without the other) rolls back and is reported as
    /// not found rather than half-deleted.
    pub async fn delete_edge(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(Self::map_tx_err)?;

        let following = sqlx::query("DELETE FROM user_following WHERE user_id = $1 AND target_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_tx_err)?;

        let followers = sqlx::query("DELETE FROM user_followers WHERE user_id = $1 AND follower_id = $2")
            .bind(followee_id)
            .bind(follower_id)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_tx_err)?;

        if following.rows_affected() == 0 || followers.rows_affected() == 0 {
            return Err(AppError::not_found("Follow edge does not exist"));
        }

        tx.commit().await.map_err(Self::map_tx_err)?;
        Ok(())
    }

    /// Check whether `follower_id` currently follows `followee_id`.
    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_following WHERE user_id = $1 AND target_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to check follow edge", e))
    }

    /// Everyone `user_id` follows.
    pub async fn following_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT target_id FROM user_following WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to load following set", e)
            })
    }

    /// Everyone following `user_id`.
    pub async fn followers_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT follower_id FROM user_followers WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to load follower set", e)
            })
    }

    /// Follower and following counts for a user.
    pub async fn edge_counts(&self, user_id: Uuid) -> AppResult<(i64, i64)> {
        let followers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_followers WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Transient, "Failed to count followers", e)
                })?;

        let following: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_following WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Transient, "Failed to count following", e)
                })?;

        Ok((followers, following))
    }

    /// Check whether `user_id` has hidden `hidden_id`.
    pub async fn is_hidden(&self, user_id: Uuid, hidden_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM hidden_users WHERE user_id = $1 AND hidden_id = $2)",
        )
        .bind(user_id)
        .bind(hidden_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to check hidden user", e))
    }

    /// Add a user to the hidden set. Idempotent.
    pub async fn hide(&self, user_id: Uuid, hidden_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO hidden_users (user_id, hidden_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(hidden_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to hide user", e))?;
        Ok(())
    }

    /// Remove a user from the hidden set. Idempotent.
    pub async fn unhide(&self, user_id: Uuid, hidden_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM hidden_users WHERE user_id = $1 AND hidden_id = $2")
            .bind(user_id)
            .bind(hidden_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to unhide user", e))?;
        Ok(())
    }

    /// Everyone `user_id` has hidden.
    pub async fn hidden_of(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT hidden_id FROM hidden_users WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to load hidden set", e)
            })
    }
}
