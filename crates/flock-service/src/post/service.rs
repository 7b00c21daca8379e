//! Post lifecycle: creation with spam and mention caps, visibility-checked
//! reads, owner-only mutation, and cascading deletion.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use flock_core::config::limits::LimitsConfig;
use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_core::types::pagination::{PageRequest, PageResponse};
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::post::PostRepository;
use flock_database::repositories::user::UserRepository;
use flock_entity::notification::{NotificationKind, NotificationPayload};
use flock_entity::post::{FeedItem, NewPost, Post, PostUpdate, Visibility};

use crate::context::RequestContext;
use crate::feed::{FeedEngine, can_view};
use crate::limiter::{RateLimiter, seconds_until_midnight_utc};
use crate::notification::NotificationFanout;
use crate::text::clamp_text;

/// Counter action for post-spam detection.
const ACTION_POST_CREATED: &str = "post_created";
/// Counter action for the daily follower-mention cap.
const ACTION_MENTIONED_FOLLOWERS: &str = "mentioned_followers";
/// Rolling window for the spam counter.
const SPAM_WINDOW: std::time::Duration = std::time::Duration::from_secs(60 * 60 * 24);
/// Token that fans a post out to every follower.
const FOLLOWERS_MENTION: &str = "@followers";

/// Manages the post lifecycle.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Post repository.
    posts: Arc<PostRepository>,
    /// User repository.
    users: Arc<UserRepository>,
    /// Social graph repository.
    graph: Arc<SocialGraphRepository>,
    /// Feed engine, for viewer-state cleanup on deletion.
    feed: Arc<FeedEngine>,
    /// Notification fan-out.
    fanout: Arc<NotificationFanout>,
    /// Attempt counters.
    limiter: Arc<RateLimiter>,
    /// Content and threshold limits.
    limits: LimitsConfig,
}

impl PostService {
    /// Create a new post service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        posts: Arc<PostRepository>,
        users: Arc<UserRepository>,
        graph: Arc<SocialGraphRepository>,
        feed: Arc<FeedEngine>,
        fanout: Arc<NotificationFanout>,
        limiter: Arc<RateLimiter>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            posts,
            users,
            graph,
            feed,
            fanout,
            limiter,
            limits,
        }
    }

    /// Create a post.
    ///
    /// Requires a verified account and at least one of text/media. A
    /// `@followers` mention in the text fans a notification out to every
    /// follower, capped per day; the spam counter is recorded only after
    /// the post exists.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        text: Option<&str>,
        media: Vec<String>,
        visibility: &str,
    ) -> AppResult<Post> {
        if !ctx.verified {
            return Err(AppError::authorization(
                "Please verify your email to create posts",
            ));
        }

        let identity = ctx.user_id.to_string();
        let attempts = self.limiter.peek(ACTION_POST_CREATED, &identity).await?;
        if attempts >= self.limits.post_daily_limit {
            return Err(AppError::rate_limit("Spam post detected"));
        }

        let (text, media, visibility) = self.validate_content(text, media, visibility)?;

        let post = self
            .posts
            .create(&NewPost {
                creator_id: ctx.user_id,
                text: text.clone(),
                media,
                visibility,
            })
            .await?;

        if text.as_deref().is_some_and(|t| t.contains(FOLLOWERS_MENTION)) {
            self.notify_followers(ctx, post.id).await?;
        }

        self.limiter
            .record(ACTION_POST_CREATED, &identity, SPAM_WINDOW)
            .await?;

        info!(post_id = %post.id, creator = %ctx.user_id, "Post created");
        Ok(post)
    }

    /// Fetch one post, enforcing visibility, with the viewer's liked flag.
    pub async fn get_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<FeedItem> {
        let post = self.require_post(post_id).await?;
        self.require_visible(ctx, &post).await?;

        let liked = self.posts.is_liked(ctx.user_id, post.id).await?;
        Ok(FeedItem { post, liked })
    }

    /// Edit a post. Owner only; content rules match creation.
    pub async fn edit_post(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: Option<&str>,
        media: Vec<String>,
        visibility: &str,
    ) -> AppResult<()> {
        let post = self.require_post(post_id).await?;
        if !post.is_owned_by(ctx.user_id) {
            return Err(AppError::authorization("You can edit only your posts"));
        }

        let (text, media, visibility) = self.validate_content(text, media, visibility)?;
        self.posts
            .update(
                post.id,
                &PostUpdate {
                    text,
                    media,
                    visibility,
                },
            )
            .await
    }

    /// Delete a post. Owner only. Cascades to comments, replies, and
    /// notifications in one transaction, then purges viewer-tracking
    /// state.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let post = self.require_post(post_id).await?;
        if !post.is_owned_by(ctx.user_id) {
            return Err(AppError::authorization("You can delete only your posts"));
        }

        self.posts.delete_cascade(post.id).await?;
        self.feed.purge_post_views(post.id).await;

        info!(post_id = %post.id, creator = %ctx.user_id, "Post deleted");
        Ok(())
    }

    /// Like a post. Visibility rules match reading; double likes conflict.
    pub async fn like_post(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let post = self.require_post(post_id).await?;
        let is_owner = post.is_owned_by(ctx.user_id);

        match post.visibility {
            Visibility::Private if !is_owner => {
                return Err(AppError::authorization("You cannot like a private post"));
            }
            Visibility::Followers if !is_owner => {
                if !self.graph.is_following(ctx.user_id, post.creator_id).await? {
                    return Err(AppError::authorization("Only followers can like this post"));
                }
            }
            _ => {}
        }

        self.posts.like(ctx.user_id, post.id).await
    }

    /// One user's posts as seen by the viewer, with liked annotations.
    pub async fn user_posts(
        &self,
        ctx: &RequestContext,
        username: &str,
        page: &PageRequest,
        newest_first: bool,
    ) -> AppResult<PageResponse<FeedItem>> {
        let owner = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let visible: Vec<Visibility> = if owner.id == ctx.user_id {
            vec![
                Visibility::Public,
                Visibility::Private,
                Visibility::Followers,
            ]
        } else if self.graph.is_following(ctx.user_id, owner.id).await? {
            vec![Visibility::Public, Visibility::Followers]
        } else {
            vec![Visibility::Public]
        };

        let posts = self
            .posts
            .posts_by_creator(
                owner.id,
                &visible,
                newest_first,
                page.limit() as i64,
                page.offset() as i64,
            )
            .await?;
        let total = self.posts.count_by_creator(owner.id, &visible).await?;

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let liked: std::collections::HashSet<Uuid> = self
            .posts
            .liked_among(ctx.user_id, &ids)
            .await?
            .into_iter()
            .collect();

        let items = posts
            .into_iter()
            .map(|post| {
                let is_liked = liked.contains(&post.id);
                FeedItem {
                    post,
                    liked: is_liked,
                }
            })
            .collect();

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Fan a mention notification out to every follower, if the daily cap
    /// allows. A capped mention silently skips the fan-out; the post itself
    /// stands.
    async fn notify_followers(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let decision = self
            .limiter
            .check(
                ACTION_MENTIONED_FOLLOWERS,
                &ctx.user_id.to_string(),
                self.limits.mention_daily_limit,
                seconds_until_midnight_utc(chrono::Utc::now()),
            )
            .await?;
        if decision.blocked {
            return Ok(());
        }

        let followers = self.graph.followers_of(ctx.user_id).await?;
        if followers.is_empty() {
            return Ok(());
        }

        self.fanout
            .create_and_dispatch(
                NotificationKind::Mention,
                format!("@{} mentioned you in a post", ctx.username.to_uppercase()),
                NotificationPayload {
                    post_id: Some(post_id),
                    sender: Some(ctx.user_id),
                    ..Default::default()
                },
                followers,
            )
            .await?;
        Ok(())
    }

    /// Validate and normalize post content.
    fn validate_content(
        &self,
        text: Option<&str>,
        media: Vec<String>,
        visibility: &str,
    ) -> AppResult<(Option<String>, Vec<String>, Visibility)> {
        let text = text.and_then(|t| clamp_text(t, self.limits.post_text_max));
        let media: Vec<String> = media
            .into_iter()
            .take(self.limits.max_post_media)
            .collect();

        if text.is_none() && media.is_empty() {
            return Err(AppError::validation("Text or media content is required"));
        }
        Ok((text, media, Visibility::parse_or_public(visibility)))
    }

    async fn require_post(&self, post_id: Uuid) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post does not exist"))
    }

    async fn require_visible(&self, ctx: &RequestContext, post: &Post) -> AppResult<()> {
        let is_owner = post.is_owned_by(ctx.user_id);
        let is_following = if is_owner {
            true
        } else {
            self.graph.is_following(ctx.user_id, post.creator_id).await?
        };

        if !can_view(post.visibility, is_owner, is_following) {
            return Err(AppError::authorization(match post.visibility {
                Visibility::Private => "The post is private",
                _ => "Only followers can view this post",
            }));
        }
        Ok(())
    }
}
