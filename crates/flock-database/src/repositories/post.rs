//! Post repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_entity::post::{NewPost, Post, PostUpdate, Visibility};

const POST_COLUMNS: &str = "p.*, u.username AS creator_username";

/// Repository for post CRUD, the feed candidate query, and likes.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post and return it.
    pub async fn create(&self, new_post: &NewPost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (creator_id, text, media, visibility) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(new_post.creator_id)
        .bind(&new_post.text)
        .bind(&new_post.media)
        .bind(new_post.visibility)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to create post", e))
    }

    /// Find a post by primary key, with the creator's username joined in.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             JOIN users u ON u.id = p.creator_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to find post", e))
    }

    /// Apply an edit to a post.
    pub async fn update(&self, id: Uuid, update: &PostUpdate) -> AppResult<()> {
        sqlx::query(
            "UPDATE posts SET text = $2, media = $3, visibility = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.text)
        .bind(&update.media)
        .bind(update.visibility)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to update post", e))?;
        Ok(())
    }

    /// Delete a post together with its comments, replies, and every
    /// notification referencing it, in one transaction.
    pub async fn delete_cascade(&self, id: Uuid) -> AppResult<()> {
        let map = |e| AppError::with_source(ErrorKind::Transient, "Failed to delete post", e);
        let mut tx = self.pool.begin().await.map_err(map)?;

        sqlx::query("DELETE FROM replies WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM notifications WHERE (payload->>'post_id')::uuid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(())
    }

    /// Feed candidate page for a viewer: newest first, excluding seen posts
    /// and hidden/own creators; `followers` posts only from followed
    /// creators.
    pub async fn feed_page(
        &self,
        excluded_posts: &[Uuid],
        excluded_creators: &[Uuid],
        following: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             JOIN users u ON u.id = p.creator_id \
             WHERE p.id <> ALL($1) \
               AND p.creator_id <> ALL($2) \
               AND (p.visibility = 'public' \
                    OR (p.visibility = 'followers' AND p.creator_id = ANY($3))) \
             ORDER BY p.created_at DESC \
             LIMIT $4 OFFSET $5"
        ))
        .bind(excluded_posts)
        .bind(excluded_creators)
        .bind(following)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to load feed page", e))
    }

    /// One user's posts restricted to the given visibility levels.
    pub async fn posts_by_creator(
        &self,
        creator_id: Uuid,
        visible: &[Visibility],
        newest_first: bool,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Post>> {
        let order = if newest_first { "DESC" } else { "ASC" };
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             JOIN users u ON u.id = p.creator_id \
             WHERE p.creator_id = $1 AND p.visibility = ANY($2) \
             ORDER BY p.created_at {order} \
             LIMIT $3 OFFSET $4"
        ))
        .bind(creator_id)
        .bind(visible)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to load user posts", e))
    }

    /// Count one user's posts restricted to the given visibility levels.
    pub async fn count_by_creator(
        &self,
        creator_id: Uuid,
        visible: &[Visibility],
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE creator_id = $1 AND visibility = ANY($2)",
        )
        .bind(creator_id)
        .bind(visible)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to count user posts", e))
    }

    /// Record a like: membership row plus counter bump in one transaction.
    /// A second like of the same post is a conflict.
    pub async fn like(&self, user_id: Uuid, post_id: Uuid) -> AppResult<()> {
        let map = |e: sqlx::Error| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::conflict("Post already liked");
                }
            }
            AppError::with_source(ErrorKind::Transient, "Failed to like post", e)
        };

        let mut tx = self.pool.begin().await.map_err(map)?;

        sqlx::query("INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;
        sqlx::query("UPDATE posts SET likes = likes + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map)?;

        tx.commit().await.map_err(map)?;
        Ok(())
    }

    /// Check whether a user has liked a post.
    pub async fn is_liked(&self, user_id: Uuid, post_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM post_likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to check like", e))
    }

    /// Of `post_ids`, the ones `user_id` has liked. One batch lookup for a
    /// whole page.
    pub async fn liked_among(&self, user_id: Uuid, post_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, Uuid>(
            "SELECT post_id FROM post_likes WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transient, "Failed to load liked set", e))
    }
}
