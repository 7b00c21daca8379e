//! Post lifecycle: validation, visibility, likes, and per-user listings.

use flock_core::error::ErrorKind;
use flock_core::types::pagination::PageRequest;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn create_requires_content_and_defaults_unknown_visibility() {
    let app = TestApp::new().await;
    let user = app.create_user("u").await;
    let ctx = app.ctx(&user);

    let err = app
        .post_service
        .create_post(&ctx, Some("   "), Vec::new(), "public")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let post = app
        .post_service
        .create_post(&ctx, Some("hello"), Vec::new(), "friends-of-friends")
        .await
        .unwrap();
    assert_eq!(post.visibility, flock_entity::post::Visibility::Public);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn private_posts_are_owner_only_and_likes_conflict_on_repeat() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let stranger = app.create_user("s").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("mine"), Vec::new(), "private")
        .await
        .unwrap();

    let err = app
        .post_service
        .get_post(&app.ctx(&stranger), post.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = app
        .post_service
        .like_post(&app.ctx(&stranger), post.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    // The owner can like it exactly once.
    app.post_service
        .like_post(&app.ctx(&owner), post.id)
        .await
        .unwrap();
    let err = app
        .post_service
        .like_post(&app.ctx(&owner), post.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let item = app
        .post_service
        .get_post(&app.ctx(&owner), post.id)
        .await
        .unwrap();
    assert!(item.liked);
    assert_eq!(item.post.likes, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn only_the_owner_may_edit_or_delete() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let other = app.create_user("x").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("original"), Vec::new(), "public")
        .await
        .unwrap();

    let err = app
        .post_service
        .edit_post(&app.ctx(&other), post.id, Some("hijack"), Vec::new(), "public")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = app
        .post_service
        .delete_post(&app.ctx(&other), post.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    app.post_service
        .edit_post(&app.ctx(&owner), post.id, Some("edited"), Vec::new(), "followers")
        .await
        .unwrap();
    let item = app
        .post_service
        .get_post(&app.ctx(&owner), post.id)
        .await
        .unwrap();
    assert_eq!(item.post.text.as_deref(), Some("edited"));

    app.post_service
        .delete_post(&app.ctx(&owner), post.id)
        .await
        .unwrap();
    let err = app
        .post_service
        .get_post(&app.ctx(&owner), post.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn user_posts_respect_ownership_and_follow_state() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let viewer = app.create_user("v").await;

    for (text, visibility) in [
        ("pub", "public"),
        ("priv", "private"),
        ("circle", "followers"),
    ] {
        app.post_service
            .create_post(&app.ctx(&owner), Some(text), Vec::new(), visibility)
            .await
            .unwrap();
    }

    let page = PageRequest::new(1, 30);

    let own_view = app
        .post_service
        .user_posts(&app.ctx(&owner), &owner.username, &page, true)
        .await
        .unwrap();
    assert_eq!(own_view.total_items, 3);

    let stranger_view = app
        .post_service
        .user_posts(&app.ctx(&viewer), &owner.username, &page, true)
        .await
        .unwrap();
    assert_eq!(stranger_view.total_items, 1);

    app.graph
        .follow(&app.ctx(&viewer), &owner.username)
        .await
        .unwrap();
    let follower_view = app
        .post_service
        .user_posts(&app.ctx(&viewer), &owner.username, &page, true)
        .await
        .unwrap();
    assert_eq!(follower_view.total_items, 2);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn mentioning_followers_notifies_them_within_the_daily_cap() {
    let app = TestApp::new().await;
    let author = app.create_user("a").await;
    let follower = app.create_user("f").await;

    app.graph
        .follow(&app.ctx(&follower), &author.username)
        .await
        .unwrap();

    app.post_service
        .create_post(
            &app.ctx(&author),
            Some("big news @followers"),
            Vec::new(),
            "public",
        )
        .await
        .unwrap();

    let notifications = app.fanout.list_for(follower.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].kind,
        flock_entity::notification::NotificationKind::Mention
    );

    // The cap allows two mention fan-outs per day; the third post mentions
    // silently.
    for _ in 0..2 {
        app.post_service
            .create_post(
                &app.ctx(&author),
                Some("more @followers"),
                Vec::new(),
                "public",
            )
            .await
            .unwrap();
    }
    assert_eq!(app.fanout.list_for(follower.id).await.unwrap().len(), 2);
}
