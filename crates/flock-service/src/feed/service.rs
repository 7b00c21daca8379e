//! Personalized feed assembly and view-history tracking.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::warn;
use uuid::Uuid;

use flock_cache::keys;
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;
use flock_core::types::pagination::PageRequest;
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::post::PostRepository;
use flock_entity::post::{FeedItem, Post};

/// Builds paginated, visibility-filtered, deduplicated feeds and tracks
/// which posts a viewer has been shown.
#[derive(Debug, Clone)]
pub struct FeedEngine {
    /// Post repository.
    posts: Arc<PostRepository>,
    /// Social graph repository.
    graph: Arc<SocialGraphRepository>,
    /// Ephemeral store backing the view-history sets.
    store: Arc<dyn EphemeralStore>,
}

impl FeedEngine {
    /// Create a new feed engine.
    pub fn new(
        posts: Arc<PostRepository>,
        graph: Arc<SocialGraphRepository>,
        store: Arc<dyn EphemeralStore>,
    ) -> Self {
        Self {
            posts,
            graph,
            store,
        }
    }

    /// Build one feed page for a viewer.
    ///
    /// Candidates exclude posts in the viewer's view history, posts from
    /// hidden creators, and the viewer's own posts; `followers` posts
    /// appear only from followed creators. Cross-page ordering is by
    /// recency at the query layer; within the page the order is shuffled
    /// per request.
    pub async fn build_feed(&self, viewer_id: Uuid, page: &PageRequest) -> AppResult<Vec<FeedItem>> {
        let history = self.viewed_post_ids(viewer_id).await?;

        let mut excluded_creators = self.graph.hidden_of(viewer_id).await?;
        excluded_creators.push(viewer_id);
        let following = self.graph.following_of(viewer_id).await?;

        let posts = self
            .posts
            .feed_page(
                &history,
                &excluded_creators,
                &following,
                page.limit() as i64,
                page.offset() as i64,
            )
            .await?;

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let liked: HashSet<Uuid> = self
            .posts
            .liked_among(viewer_id, &ids)
            .await?
            .into_iter()
            .collect();

        Ok(annotate_and_shuffle(posts, &liked))
    }

    /// Record that a post was shown to a viewer. Idempotent: the first call
    /// writes both the viewer's history set and the post's viewer set,
    /// repeats are no-ops.
    pub async fn record_view(&self, viewer_id: Uuid, post_id: Uuid) -> AppResult<()> {
        let history_key = keys::view_history(viewer_id);
        let post_key = post_id.to_string();

        if self.store.set_contains(&history_key, &post_key).await? {
            return Ok(());
        }
        self.store.set_add(&history_key, &post_key).await?;
        self.store
            .set_add(&keys::post_viewers(post_id), &viewer_id.to_string())
            .await?;
        Ok(())
    }

    /// Remove a deleted post from every viewer's history and drop its
    /// viewer set. Degrades gracefully: the post is already gone, so a
    /// store failure here is logged rather than surfaced.
    pub async fn purge_post_views(&self, post_id: Uuid) {
        if let Err(e) = self.try_purge_post_views(post_id).await {
            warn!(post_id = %post_id, error = %e, "Failed to purge view state");
        }
    }

    async fn try_purge_post_views(&self, post_id: Uuid) -> AppResult<()> {
        let viewers_key = keys::post_viewers(post_id);
        let post_key = post_id.to_string();

        for viewer in self.store.set_members(&viewers_key).await? {
            if let Ok(viewer_id) = viewer.parse::<Uuid>() {
                self.store
                    .set_remove(&keys::view_history(viewer_id), &post_key)
                    .await?;
            }
        }
        self.store.delete(&viewers_key).await
    }

    /// The viewer's view-history set as post ids.
    async fn viewed_post_ids(&self, viewer_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .store
            .set_members(&keys::view_history(viewer_id))
            .await?
            .iter()
            .filter_map(|raw| raw.parse().ok())
            .collect())
    }
}

/// Annotate a page with liked flags and shuffle it in place.
fn annotate_and_shuffle(posts: Vec<Post>, liked: &HashSet<Uuid>) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = posts
        .into_iter()
        .map(|post| {
            let is_liked = liked.contains(&post.id);
            FeedItem {
                post,
                liked: is_liked,
            }
        })
        .collect();
    items.shuffle(&mut rand::thread_rng());
    items
}
