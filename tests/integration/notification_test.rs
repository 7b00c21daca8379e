//! Notification fan-out, acknowledgment, and garbage collection.

use flock_core::error::ErrorKind;
use flock_entity::notification::{NotificationKind, NotificationPayload};

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn record_is_deleted_after_the_last_acknowledgment_and_not_before() {
    let app = TestApp::new().await;
    let x = app.create_user("x").await;
    let y = app.create_user("y").await;

    let notification = app
        .fanout
        .create_and_dispatch(
            NotificationKind::Comment,
            "New comment from @ADA".to_string(),
            NotificationPayload::default(),
            vec![x.id, y.id],
        )
        .await
        .unwrap();

    app.fanout.acknowledge(notification.id, x.id).await.unwrap();

    // X no longer sees it, Y still does.
    assert!(
        !app.fanout
            .list_for(x.id)
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == notification.id)
    );
    assert!(
        app.fanout
            .list_for(y.id)
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == notification.id)
    );

    app.fanout.acknowledge(notification.id, y.id).await.unwrap();

    // The record is gone entirely now.
    let err = app
        .fanout
        .acknowledge(notification.id, y.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn connected_receivers_get_a_live_copy_and_offline_ones_do_not_block_it() {
    let app = TestApp::new().await;
    let online = app.create_user("on").await;
    let offline = app.create_user("off").await;

    let (_handle, mut rx) = app.presence.register(online.id);

    app.fanout
        .create_and_dispatch(
            NotificationKind::Mention,
            "@ADA mentioned you in a post".to_string(),
            NotificationPayload::default(),
            vec![online.id, offline.id],
        )
        .await
        .unwrap();

    let raw = rx.try_recv().expect("live copy for the connected receiver");
    assert!(raw.contains("mention"));

    // The offline receiver still has the durable record.
    assert_eq!(app.fanout.list_for(offline.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn commenting_on_anothers_post_notifies_the_creator() {
    let app = TestApp::new().await;
    let creator = app.create_user("cr").await;
    let commenter = app.create_user("co").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("hello"), Vec::new(), "public")
        .await
        .unwrap();

    app.comment_service
        .add_comment(&app.ctx(&commenter), post.id, "nice post")
        .await
        .unwrap();

    let notifications = app.fanout.list_for(creator.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Comment);
    assert_eq!(notifications[0].payload.post_id, Some(post.id));

    // Commenting on your own post stays silent.
    app.comment_service
        .add_comment(&app.ctx(&creator), post.id, "thanks")
        .await
        .unwrap();
    assert_eq!(app.fanout.list_for(creator.id).await.unwrap().len(), 1);
}
