//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_entity::user::{User, UserSummary};

/// Repository for user lookup operations.
///
/// Account creation and credential handling live in the external identity
/// layer; this repository only resolves and projects existing users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to find user by id", e)
            })
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to find user by username", e)
            })
    }

    /// Check whether a username resolves to a user.
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to check username", e))
    }

    /// Project a batch of user ids into summaries.
    pub async fn summaries_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, UserSummary>("SELECT id, username FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Failed to load user summaries", e)
            })
    }

    /// Project a batch of usernames into summaries.
    pub async fn summaries_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<UserSummary>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, username FROM users WHERE username = ANY($1)",
        )
        .bind(usernames)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Transient, "Failed to load user summaries", e)
        })
    }

    /// Update a user's bio text.
    pub async fn update_bio(&self, id: Uuid, bio: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET bio = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(bio)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to update bio", e))?;
        Ok(())
    }
}
