//! Shared harness for the DB-backed integration tests.

use std::sync::Arc;

use uuid::Uuid;

use flock_cache::memory::MemoryStore;
use flock_core::config::limits::LimitsConfig;
use flock_core::config::realtime::RealtimeConfig;
use flock_core::config::DatabaseConfig;
use flock_core::traits::store::EphemeralStore;
use flock_database::DatabasePool;
use flock_database::repositories::comment::CommentRepository;
use flock_database::repositories::graph::SocialGraphRepository;
use flock_database::repositories::notification::NotificationRepository;
use flock_database::repositories::post::PostRepository;
use flock_database::repositories::reply::ReplyRepository;
use flock_database::repositories::user::UserRepository;
use flock_entity::user::User;
use flock_realtime::PresenceRegistry;
use flock_service::RequestContext;
use flock_service::comment::CommentService;
use flock_service::feed::FeedEngine;
use flock_service::graph::SocialGraphService;
use flock_service::limiter::RateLimiter;
use flock_service::notification::NotificationFanout;
use flock_service::post::PostService;
use flock_service::profile::ProfileService;
use flock_service::recency::{RecencyTracker, VisitorLog};

/// Everything a test needs, wired against a live database and an
/// in-memory ephemeral store.
pub struct TestApp {
    pub db: DatabasePool,
    pub store: Arc<dyn EphemeralStore>,
    pub presence: Arc<PresenceRegistry>,
    pub graph_repo: Arc<SocialGraphRepository>,
    pub graph: SocialGraphService,
    pub feed: Arc<FeedEngine>,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub profile_service: ProfileService,
    pub fanout: Arc<NotificationFanout>,
}

impl TestApp {
    pub async fn new() -> Self {
        let url = std::env::var("FLOCK_TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "postgres://localhost:5432/flock_test".to_string());

        let config = DatabaseConfig {
            url,
            ..DatabaseConfig::default()
        };
        let db = DatabasePool::connect(&config).await.expect("db connect");
        flock_database::migration::run_migrations(db.pool())
            .await
            .expect("migrations");

        let store: Arc<dyn EphemeralStore> = Arc::new(MemoryStore::new());
        let presence = Arc::new(PresenceRegistry::new(&RealtimeConfig::default()));
        let limits = LimitsConfig::default();

        let users = Arc::new(UserRepository::new(db.pool().clone()));
        let graph_repo = Arc::new(SocialGraphRepository::new(db.pool().clone()));
        let posts = Arc::new(PostRepository::new(db.pool().clone()));
        let comments = Arc::new(CommentRepository::new(db.pool().clone()));
        let replies = Arc::new(ReplyRepository::new(db.pool().clone()));
        let notifications = Arc::new(NotificationRepository::new(db.pool().clone()));

        let fanout = Arc::new(NotificationFanout::new(
            Arc::clone(&notifications),
            Arc::clone(&presence),
            &limits,
        ));
        let feed = Arc::new(FeedEngine::new(
            Arc::clone(&posts),
            Arc::clone(&graph_repo),
            Arc::clone(&store),
        ));
        let limiter = Arc::new(RateLimiter::new(Arc::clone(&store)));

        let graph = SocialGraphService::new(Arc::clone(&users), Arc::clone(&graph_repo));
        let post_service = PostService::new(
            Arc::clone(&posts),
            Arc::clone(&users),
            Arc::clone(&graph_repo),
            Arc::clone(&feed),
            Arc::clone(&fanout),
            Arc::clone(&limiter),
            limits.clone(),
        );
        let comment_service = CommentService::new(
            comments,
            replies,
            Arc::clone(&posts),
            Arc::clone(&graph_repo),
            Arc::clone(&fanout),
            limits.clone(),
        );
        let profile_service = ProfileService::new(
            Arc::clone(&users),
            Arc::clone(&graph_repo),
            Arc::new(RecencyTracker::new(Arc::clone(&store))),
            Arc::new(VisitorLog::new(Arc::clone(&store))),
            limits,
        );

        Self {
            db,
            store,
            presence,
            graph_repo,
            graph,
            feed,
            post_service,
            comment_service,
            profile_service,
            fanout,
        }
    }

    /// Insert a verified user with a unique username.
    pub async fn create_user(&self, prefix: &str) -> User {
        let suffix: String = Uuid::new_v4().simple().to_string();
        let username = format!("{prefix}{}", &suffix[..8]);
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, verified) \
             VALUES ($1, $1 || '@example.com', TRUE) RETURNING *",
        )
        .bind(&username)
        .fetch_one(self.db.pool())
        .await
        .expect("create user")
    }

    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::for_user(user)
    }
}
