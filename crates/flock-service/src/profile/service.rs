//! Profile projections and the recency-backed history features.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use flock_core::config::limits::LimitsConfig;
use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::user::UserRepository;
use flock_entity::user::UserSummary;

use crate::context::RequestContext;
use crate::recency::{RecencyTracker, VisitorLog};
use crate::text::clamp_text;

/// Recency-list kind for search history.
const KIND_SEARCH: &str = "search";

/// A user profile as seen by a specific viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile owner's id.
    pub id: Uuid,
    /// Profile owner's username.
    pub username: String,
    /// Profile bio text.
    pub bio: Option<String>,
    /// Number of followers.
    pub followers: i64,
    /// Number of followed users.
    pub following: i64,
    /// Whether the viewer follows this user.
    pub im_following: bool,
    /// Whether the viewer has hidden this user.
    pub hidden: bool,
}

/// A profile visitor with their last visit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorEntry {
    /// The visiting user.
    pub user: UserSummary,
    /// Last visit time in epoch milliseconds.
    pub visited_at: i64,
}

/// Profile reads plus the search-history and visitor-log features.
#[derive(Debug, Clone)]
pub struct ProfileService {
    /// User repository.
    users: Arc<UserRepository>,
    /// Social graph repository.
    graph: Arc<SocialGraphRepository>,
    /// Search history lists.
    recency: Arc<RecencyTracker>,
    /// Visitor log.
    visitors: Arc<VisitorLog>,
    /// Capacity limits.
    limits: LimitsConfig,
}

impl ProfileService {
    /// Create a new profile service.
    pub fn new(
        users: Arc<UserRepository>,
        graph: Arc<SocialGraphRepository>,
        recency: Arc<RecencyTracker>,
        visitors: Arc<VisitorLog>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            users,
            graph,
            recency,
            visitors,
            limits,
        }
    }

    /// A user's profile with edge counts and the viewer's relation flags.
    pub async fn user_profile(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> AppResult<UserProfile> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let (followers, following) = self.graph.edge_counts(user.id).await?;
        let im_following = self.graph.is_following(ctx.user_id, user.id).await?;
        let hidden = self.graph.is_hidden(ctx.user_id, user.id).await?;

        Ok(UserProfile {
            id: user.id,
            username: user.username,
            bio: user.bio,
            followers,
            following,
            im_following,
            hidden,
        })
    }

    /// Everyone a user follows, as summaries.
    pub async fn following_list(&self, username: &str) -> AppResult<Vec<UserSummary>> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let following = self.graph.following_of(user.id).await?;
        self.users.summaries_by_ids(&following).await
    }

    /// Update the actor's bio text.
    pub async fn update_bio(&self, ctx: &RequestContext, text: &str) -> AppResult<()> {
        let bio = clamp_text(text, self.limits.bio_text_max)
            .ok_or_else(|| AppError::validation("Text is required"))?;
        self.users.update_bio(ctx.user_id, &bio).await
    }

    /// Record a profile search; the searched username moves to the front
    /// of the actor's history.
    pub async fn record_search(&self, ctx: &RequestContext, username: &str) -> AppResult<()> {
        let username = normalize_username(username)?;
        if !self.users.username_exists(&username).await? {
            return Err(AppError::not_found("User not found"));
        }

        self.recency
            .touch(
                KIND_SEARCH,
                &ctx.user_id.to_string(),
                &username,
                self.limits.search_history_capacity,
            )
            .await
    }

    /// The actor's search history, hydrated into summaries in history
    /// order. Usernames that no longer resolve are silently dropped.
    pub async fn search_history(&self, ctx: &RequestContext) -> AppResult<Vec<UserSummary>> {
        let history = self
            .recency
            .list(
                KIND_SEARCH,
                &ctx.user_id.to_string(),
                self.limits.search_history_capacity,
            )
            .await?;
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = self.users.summaries_by_usernames(&history).await?;
        Ok(history
            .iter()
            .filter_map(|username| {
                summaries
                    .iter()
                    .find(|summary| &summary.username == username)
                    .cloned()
            })
            .collect())
    }

    /// Drop one username from the actor's search history.
    pub async fn forget_search(&self, ctx: &RequestContext, username: &str) -> AppResult<()> {
        let username = normalize_username(username)?;
        self.recency
            .remove(KIND_SEARCH, &ctx.user_id.to_string(), &username)
            .await
    }

    /// Record a profile visit. A failed touch is logged, never surfaced:
    /// the visitor log is a best-effort UX feature.
    pub async fn record_visit(&self, owner: &str, visitor: &str) -> AppResult<()> {
        let owner = normalize_username(owner)?;
        let visitor = normalize_username(visitor)?;

        if !self.users.username_exists(&owner).await?
            || !self.users.username_exists(&visitor).await?
        {
            return Err(AppError::not_found("User or visitor not found"));
        }

        if let Err(e) = self
            .visitors
            .touch(&owner, &visitor, self.limits.visitor_log_capacity)
            .await
        {
            warn!(owner, visitor, error = %e, "Failed to record visit");
        }
        Ok(())
    }

    /// A user's recent visitors with timestamps, most recent first.
    pub async fn visitors(&self, owner: &str) -> AppResult<Vec<VisitorEntry>> {
        let owner = normalize_username(owner)?;
        if !self.users.username_exists(&owner).await? {
            return Err(AppError::not_found("User not found"));
        }

        let visits = self.visitors.visitors(&owner).await?;
        if visits.is_empty() {
            return Ok(Vec::new());
        }

        let usernames: Vec<String> = visits.iter().map(|v| v.visitor.clone()).collect();
        let summaries = self.users.summaries_by_usernames(&usernames).await?;

        Ok(visits
            .into_iter()
            .filter_map(|visit| {
                summaries
                    .iter()
                    .find(|summary| summary.username == visit.visitor)
                    .cloned()
                    .map(|user| VisitorEntry {
                        user,
                        visited_at: visit.visited_at,
                    })
            })
            .collect())
    }
}

/// Lowercase and trim a username, rejecting empty input.
fn normalize_username(username: &str) -> AppResult<String> {
    let normalized = username.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    Ok(normalized)
}
