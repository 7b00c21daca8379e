//! Profile projections, search history, and the visitor log.

use flock_core::error::ErrorKind;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn profile_reports_counts_and_viewer_relation_flags() {
    let app = TestApp::new().await;
    let viewer = app.create_user("v").await;
    let target = app.create_user("t").await;
    let fan = app.create_user("f").await;

    app.graph
        .follow(&app.ctx(&viewer), &target.username)
        .await
        .unwrap();
    app.graph
        .follow(&app.ctx(&fan), &target.username)
        .await
        .unwrap();
    app.graph
        .follow(&app.ctx(&target), &fan.username)
        .await
        .unwrap();

    let profile = app
        .profile_service
        .user_profile(&app.ctx(&viewer), &target.username)
        .await
        .unwrap();
    assert_eq!(profile.followers, 2);
    assert_eq!(profile.following, 1);
    assert!(profile.im_following);
    assert!(!profile.hidden);

    let err = app
        .profile_service
        .user_profile(&app.ctx(&viewer), "nobody-here")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn following_list_projects_summaries() {
    let app = TestApp::new().await;
    let user = app.create_user("u").await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;

    app.graph.follow(&app.ctx(&user), &a.username).await.unwrap();
    app.graph.follow(&app.ctx(&user), &b.username).await.unwrap();

    let list = app
        .profile_service
        .following_list(&user.username)
        .await
        .unwrap();
    let names: Vec<&str> = list.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(list.len(), 2);
    assert!(names.contains(&a.username.as_str()));
    assert!(names.contains(&b.username.as_str()));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn search_history_is_deduplicated_most_recent_first() {
    let app = TestApp::new().await;
    let searcher = app.create_user("s").await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let ctx = app.ctx(&searcher);

    app.profile_service
        .record_search(&ctx, &a.username)
        .await
        .unwrap();
    app.profile_service
        .record_search(&ctx, &b.username)
        .await
        .unwrap();
    app.profile_service
        .record_search(&ctx, &a.username)
        .await
        .unwrap();

    let history = app.profile_service.search_history(&ctx).await.unwrap();
    let names: Vec<&str> = history.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(names, vec![a.username.as_str(), b.username.as_str()]);

    app.profile_service
        .forget_search(&ctx, &b.username)
        .await
        .unwrap();
    let history = app.profile_service.search_history(&ctx).await.unwrap();
    assert_eq!(history.len(), 1);

    let err = app
        .profile_service
        .record_search(&ctx, "ghost-user")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn visitor_log_tracks_visits_with_timestamps() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let first = app.create_user("f").await;
    let second = app.create_user("s").await;

    app.profile_service
        .record_visit(&owner.username, &first.username)
        .await
        .unwrap();
    app.profile_service
        .record_visit(&owner.username, &second.username)
        .await
        .unwrap();

    let visitors = app
        .profile_service
        .visitors(&owner.username)
        .await
        .unwrap();
    assert_eq!(visitors.len(), 2);
    assert_eq!(visitors[0].user.username, second.username);
    assert_eq!(visitors[1].user.username, first.username);
    assert!(visitors.iter().all(|v| v.visited_at > 0));

    let err = app
        .profile_service
        .record_visit(&owner.username, "ghost-user")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn bio_updates_are_clamped_and_persisted() {
    let app = TestApp::new().await;
    let user = app.create_user("u").await;
    let ctx = app.ctx(&user);

    app.profile_service
        .update_bio(&ctx, "  building things  ")
        .await
        .unwrap();

    let profile = app
        .profile_service
        .user_profile(&ctx, &user.username)
        .await
        .unwrap();
    assert_eq!(profile.bio.as_deref(), Some("building things"));

    let err = app.profile_service.update_bio(&ctx, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
