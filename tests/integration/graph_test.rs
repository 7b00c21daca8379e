//! Follow-graph behavior against a live database.

use flock_core::error::ErrorKind;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn follow_creates_both_sides_and_unfollow_removes_them() {
    let app = TestApp::new().await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let ctx = app.ctx(&a);

    app.graph.follow(&ctx, &b.username).await.unwrap();

    assert!(app.graph_repo.following_of(a.id).await.unwrap().contains(&b.id));
    assert!(app.graph_repo.followers_of(b.id).await.unwrap().contains(&a.id));

    app.graph.unfollow(&ctx, &b.username).await.unwrap();

    assert!(app.graph_repo.following_of(a.id).await.unwrap().is_empty());
    assert!(app.graph_repo.followers_of(b.id).await.unwrap().is_empty());

    // A second unfollow finds no edge.
    let err = app.graph.unfollow(&ctx, &b.username).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn self_follow_is_rejected_and_leaves_graph_unchanged() {
    let app = TestApp::new().await;
    let a = app.create_user("a").await;
    let ctx = app.ctx(&a);

    let err = app.graph.follow(&ctx, &a.username).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let (followers, following) = app.graph_repo.edge_counts(a.id).await.unwrap();
    assert_eq!((followers, following), (0, 0));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn duplicate_follow_is_a_conflict() {
    let app = TestApp::new().await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let ctx = app.ctx(&a);

    app.graph.follow(&ctx, &b.username).await.unwrap();
    let err = app.graph.follow(&ctx, &b.username).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Still exactly one edge on each side.
    assert_eq!(app.graph_repo.following_of(a.id).await.unwrap().len(), 1);
    assert_eq!(app.graph_repo.followers_of(b.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn edge_sides_agree_after_a_mixed_sequence() {
    let app = TestApp::new().await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let c = app.create_user("c").await;

    app.graph.follow(&app.ctx(&a), &b.username).await.unwrap();
    app.graph.follow(&app.ctx(&a), &c.username).await.unwrap();
    app.graph.follow(&app.ctx(&b), &a.username).await.unwrap();
    app.graph.unfollow(&app.ctx(&a), &c.username).await.unwrap();

    for user in [&a, &b, &c] {
        for target in [&a, &b, &c] {
            let forward = app
                .graph_repo
                .following_of(user.id)
                .await
                .unwrap()
                .contains(&target.id);
            let backward = app
                .graph_repo
                .followers_of(target.id)
                .await
                .unwrap()
                .contains(&user.id);
            assert_eq!(forward, backward, "sides diverged");
        }
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn toggle_hidden_flips_state() {
    let app = TestApp::new().await;
    let a = app.create_user("a").await;
    let b = app.create_user("b").await;
    let ctx = app.ctx(&a);

    assert!(app.graph.toggle_hidden(&ctx, b.id).await.unwrap());
    assert!(app.graph_repo.is_hidden(a.id, b.id).await.unwrap());
    assert!(!app.graph.toggle_hidden(&ctx, b.id).await.unwrap());
    assert!(!app.graph_repo.is_hidden(a.id, b.id).await.unwrap());

    let err = app.graph.toggle_hidden(&ctx, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
