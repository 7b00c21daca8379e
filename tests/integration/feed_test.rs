//! Feed exclusion, visibility filtering, and view tracking.

use flock_core::types::pagination::PageRequest;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn feed_applies_visibility_and_view_history_exclusions() {
    let app = TestApp::new().await;
    let viewer = app.create_user("v").await;
    let creator = app.create_user("c").await;

    let public_post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("public"), Vec::new(), "public")
        .await
        .unwrap();
    let followers_post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("inner circle"), Vec::new(), "followers")
        .await
        .unwrap();
    let private_post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("secret"), Vec::new(), "private")
        .await
        .unwrap();

    // A wide page keeps the assertions stable when other tests share the
    // database.
    let page = PageRequest::new(1, 100);
    let feed_ids = |items: Vec<flock_entity::post::FeedItem>| -> Vec<Uuid> {
        items.into_iter().map(|i| i.post.id).collect()
    };

    // Not following: only the public post shows.
    let ids = feed_ids(app.feed.build_feed(viewer.id, &page).await.unwrap());
    assert!(ids.contains(&public_post.id));
    assert!(!ids.contains(&followers_post.id));

    // Following: the followers-only post appears too, never the private one.
    app.graph
        .follow(&app.ctx(&viewer), &creator.username)
        .await
        .unwrap();
    let ids = feed_ids(app.feed.build_feed(viewer.id, &page).await.unwrap());
    assert!(ids.contains(&public_post.id));
    assert!(ids.contains(&followers_post.id));
    assert!(!ids.contains(&private_post.id));

    // A viewed post never comes back, on any page.
    app.feed.record_view(viewer.id, public_post.id).await.unwrap();
    let ids = feed_ids(app.feed.build_feed(viewer.id, &page).await.unwrap());
    assert!(!ids.contains(&public_post.id));
    assert!(ids.contains(&followers_post.id));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn feed_skips_hidden_creators_and_own_posts() {
    let app = TestApp::new().await;
    let viewer = app.create_user("v").await;
    let creator = app.create_user("c").await;

    app.post_service
        .create_post(&app.ctx(&creator), Some("from creator"), Vec::new(), "public")
        .await
        .unwrap();
    let own = app
        .post_service
        .create_post(&app.ctx(&viewer), Some("from viewer"), Vec::new(), "public")
        .await
        .unwrap();

    app.graph
        .toggle_hidden(&app.ctx(&viewer), creator.id)
        .await
        .unwrap();

    let page = PageRequest::new(1, 100);
    let items = app.feed.build_feed(viewer.id, &page).await.unwrap();
    assert!(items.iter().all(|i| i.post.creator_id != creator.id));
    assert!(items.iter().all(|i| i.post.id != own.id));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deleting_a_post_purges_every_viewers_history() {
    let app = TestApp::new().await;
    let viewer = app.create_user("v").await;
    let creator = app.create_user("c").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("soon gone"), Vec::new(), "public")
        .await
        .unwrap();

    app.feed.record_view(viewer.id, post.id).await.unwrap();
    app.post_service
        .delete_post(&app.ctx(&creator), post.id)
        .await
        .unwrap();

    use flock_cache::keys;
    use flock_core::traits::store::EphemeralStore as _;
    assert!(
        !app.store
            .set_contains(&keys::view_history(viewer.id), &post.id.to_string())
            .await
            .unwrap()
    );
    assert!(
        app.store
            .set_members(&keys::post_viewers(post.id))
            .await
            .unwrap()
            .is_empty()
    );
}
