//! Comments and replies: visibility-checked creation with counter updates
//! and notification fan-out, author-only mutation, cascading deletion.

use std::sync::Arc;

use uuid::Uuid;

use flock_core::config::limits::LimitsConfig;
use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_core::types::pagination::{PageRequest, PageResponse};
use flock_database::repositories::comment::CommentRepository;
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::post::PostRepository;
use flock_database::repositories::reply::ReplyRepository;
use flock_entity::comment::Comment;
use flock_entity::notification::{NotificationKind, NotificationPayload};
use flock_entity::post::{Post, Visibility};
use flock_entity::reply::Reply;

use crate::context::RequestContext;
use crate::feed::can_view;
use crate::notification::NotificationFanout;
use crate::text::clamp_text;

/// Manages comments and replies.
#[derive(Debug, Clone)]
pub struct CommentService {
    /// Comment repository.
    comments: Arc<CommentRepository>,
    /// Reply repository.
    replies: Arc<ReplyRepository>,
    /// Post repository, for parent lookups.
    posts: Arc<PostRepository>,
    /// Social graph repository, for visibility checks.
    graph: Arc<SocialGraphRepository>,
    /// Notification fan-out.
    fanout: Arc<NotificationFanout>,
    /// Content limits.
    limits: LimitsConfig,
}

impl CommentService {
    /// Create a new comment service.
    pub fn new(
        comments: Arc<CommentRepository>,
        replies: Arc<ReplyRepository>,
        posts: Arc<PostRepository>,
        graph: Arc<SocialGraphRepository>,
        fanout: Arc<NotificationFanout>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            comments,
            replies,
            posts,
            graph,
            fanout,
            limits,
        }
    }

    /// Comment on a post. The post creator is notified unless they are the
    /// commenter.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: &str,
    ) -> AppResult<Comment> {
        if !ctx.verified {
            return Err(AppError::authorization("Please verify your email to comment"));
        }
        let text = clamp_text(text, self.limits.comment_text_max)
            .ok_or_else(|| AppError::validation("Text is required"))?;

        let post = self.require_post(post_id).await?;
        self.require_visible(ctx, &post, "comment on").await?;

        let comment = self.comments.create(post.id, ctx.user_id, &text).await?;

        if !post.is_owned_by(ctx.user_id) {
            self.fanout
                .create_and_dispatch(
                    NotificationKind::Comment,
                    format!("New comment from @{}", ctx.username.to_uppercase()),
                    NotificationPayload {
                        post_id: Some(post.id),
                        comment_id: Some(comment.id),
                        sender: Some(ctx.user_id),
                        ..Default::default()
                    },
                    vec![post.creator_id],
                )
                .await?;
        }

        Ok(comment)
    }

    /// One page of a post's comments, the viewer's own first.
    pub async fn list_comments(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Comment>> {
        let post = self.require_post(post_id).await?;
        self.require_visible(ctx, &post, "see the comments of").await?;

        let comments = self
            .comments
            .list_for_post(
                post.id,
                ctx.user_id,
                page.limit() as i64,
                page.offset() as i64,
            )
            .await?;
        let total = self.comments.count_for_post(post.id).await?;

        Ok(PageResponse::new(
            comments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Edit a comment. Author only.
    pub async fn edit_comment(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
        text: &str,
    ) -> AppResult<()> {
        let comment = self.require_comment(comment_id).await?;
        if !comment.is_authored_by(ctx.user_id) {
            return Err(AppError::authorization("You can edit only your comment"));
        }
        let text = clamp_text(text, self.limits.comment_text_max)
            .ok_or_else(|| AppError::validation("Comment text cannot be empty"))?;

        self.comments.update_text(comment.id, &text).await
    }

    /// Delete a comment with its replies and notifications. Author only.
    pub async fn delete_comment(&self, ctx: &RequestContext, comment_id: Uuid) -> AppResult<()> {
        let comment = self.require_comment(comment_id).await?;
        if !comment.is_authored_by(ctx.user_id) {
            return Err(AppError::authorization("You can delete only your comment"));
        }
        self.comments.delete_cascade(comment.id).await
    }

    /// Reply under a comment. The post creator and the comment author are
    /// notified, excluding the replier.
    pub async fn add_reply(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> AppResult<Reply> {
        if !ctx.verified {
            return Err(AppError::authorization("Please verify your email to reply"));
        }
        let text = clamp_text(text, self.limits.comment_text_max)
            .ok_or_else(|| AppError::validation("Text is required"))?;

        let post = self.require_post(post_id).await?;
        let comment = self.require_comment(comment_id).await?;
        if comment.post_id != post.id {
            return Err(AppError::validation("Comment does not belong to this post"));
        }
        self.require_visible(ctx, &post, "reply on").await?;

        let reply = self
            .replies
            .create(comment.id, post.id, ctx.user_id, &text)
            .await?;

        let receivers: Vec<Uuid> = [post.creator_id, comment.author_id]
            .into_iter()
            .filter(|id| *id != ctx.user_id)
            .collect();
        if !receivers.is_empty() {
            self.fanout
                .create_and_dispatch(
                    NotificationKind::Reply,
                    format!("Reply from @{}", ctx.username.to_uppercase()),
                    NotificationPayload {
                        post_id: Some(post.id),
                        comment_id: Some(comment.id),
                        reply_id: Some(reply.id),
                        sender: Some(ctx.user_id),
                    },
                    receivers,
                )
                .await?;
        }

        Ok(reply)
    }

    /// One page of a comment's replies; the viewer's and the post
    /// creator's replies sort first.
    pub async fn list_replies(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reply>> {
        let comment = self.require_comment(comment_id).await?;
        let post = self.require_post(comment.post_id).await?;
        self.require_visible(ctx, &post, "see the replies of").await?;

        let priority = [ctx.user_id, post.creator_id];
        let replies = self
            .replies
            .list_for_comment(
                comment.id,
                &priority,
                page.limit() as i64,
                page.offset() as i64,
            )
            .await?;
        let total = self.replies.count_for_comment(comment.id).await?;

        Ok(PageResponse::new(
            replies,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Edit a reply. Author only.
    pub async fn edit_reply(
        &self,
        ctx: &RequestContext,
        reply_id: Uuid,
        text: &str,
    ) -> AppResult<()> {
        let reply = self.require_reply(reply_id).await?;
        if !reply.is_authored_by(ctx.user_id) {
            return Err(AppError::authorization("You can edit only your reply"));
        }
        let text = clamp_text(text, self.limits.comment_text_max)
            .ok_or_else(|| AppError::validation("Reply text cannot be empty"))?;

        self.replies.update_text(reply.id, &text).await
    }

    /// Delete a reply and its notification. Author only.
    pub async fn delete_reply(&self, ctx: &RequestContext, reply_id: Uuid) -> AppResult<()> {
        let reply = self.require_reply(reply_id).await?;
        if !reply.is_authored_by(ctx.user_id) {
            return Err(AppError::authorization("You can delete only your reply"));
        }
        self.replies.delete_cascade(reply.id).await
    }

    async fn require_post(&self, post_id: Uuid) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    async fn require_comment(&self, comment_id: Uuid) -> AppResult<Comment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment does not exist"))
    }

    async fn require_reply(&self, reply_id: Uuid) -> AppResult<Reply> {
        self.replies
            .find_by_id(reply_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reply does not exist"))
    }

    async fn require_visible(
        &self,
        ctx: &RequestContext,
        post: &Post,
        action: &str,
    ) -> AppResult<()> {
        let is_owner = post.is_owned_by(ctx.user_id);
        let is_following = if is_owner {
            true
        } else {
            self.graph.is_following(ctx.user_id, post.creator_id).await?
        };

        if !can_view(post.visibility, is_owner, is_following) {
            return Err(AppError::authorization(match post.visibility {
                Visibility::Private => format!("You cannot {action} a private post"),
                _ => format!("Only followers can {action} this post"),
            }));
        }
        Ok(())
    }
}
