//! Follow, unfollow, and hide operations.
//!
//! The dual-sided edge write itself lives in the repository transaction;
//! this service owns resolution and the validation rules around it.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::user::UserRepository;

use crate::context::RequestContext;

/// Mutates the bidirectional follow relationship and the hidden-user
/// relation.
#[derive(Debug, Clone)]
pub struct SocialGraphService {
    /// User repository, for username resolution.
    users: Arc<UserRepository>,
    /// Social graph repository.
    graph: Arc<SocialGraphRepository>,
}

impl SocialGraphService {
    /// Create a new social graph service.
    pub fn new(users: Arc<UserRepository>, graph: Arc<SocialGraphRepository>) -> Self {
        Self { users, graph }
    }

    /// Follow a user by username.
    ///
    /// Both sides of the edge commit atomically or not at all; a failure
    /// mid-write surfaces as retryable with no partial edge left behind.
    pub async fn follow(&self, ctx: &RequestContext, target_username: &str) -> AppResult<()> {
        if !ctx.verified {
            return Err(AppError::authorization("Please verify your email to follow"));
        }

        let target = self
            .users
            .find_by_username(target_username)
            .await?
            .ok_or_else(|| AppError::not_found("User does not exist"))?;

        if target.id == ctx.user_id {
            return Err(AppError::validation("You cannot follow yourself"));
        }
        if self.graph.is_following(ctx.user_id, target.id).await? {
            return Err(AppError::conflict("Already following"));
        }

        self.graph.insert_edge(ctx.user_id, target.id).await?;
        info!(actor = %ctx.user_id, target = %target.id, "Follow edge created");
        Ok(())
    }

    /// Unfollow a user by username. Fails with not-found when the edge
    /// does not currently exist.
    pub async fn unfollow(&self, ctx: &RequestContext, target_username: &str) -> AppResult<()> {
        let target = self
            .users
            .find_by_username(target_username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self.graph.is_following(ctx.user_id, target.id).await? {
            return Err(AppError::not_found(format!(
                "You are not following @{}",
                target.username.to_uppercase()
            )));
        }

        self.graph.delete_edge(ctx.user_id, target.id).await?;
        info!(actor = %ctx.user_id, target = %target.id, "Follow edge removed");
        Ok(())
    }

    /// Flip whether `target_id`'s posts are hidden from the actor's feed.
    /// Single-sided and idempotent per state. Returns the new hidden state.
    pub async fn toggle_hidden(&self, ctx: &RequestContext, target_id: Uuid) -> AppResult<bool> {
        if target_id == ctx.user_id {
            return Err(AppError::validation("You cannot hide yourself"));
        }
        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let hidden = self.graph.is_hidden(ctx.user_id, target_id).await?;
        if hidden {
            self.graph.unhide(ctx.user_id, target_id).await?;
        } else {
            self.graph.hide(ctx.user_id, target_id).await?;
        }
        Ok(!hidden)
    }
}
