//! Comments and replies: counters, ordering inputs, cascades, ownership.

use flock_core::error::ErrorKind;
use flock_core::types::pagination::PageRequest;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn comments_and_replies_bump_the_denormalized_counters() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let commenter = app.create_user("c").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("hello"), Vec::new(), "public")
        .await
        .unwrap();

    let comment = app
        .comment_service
        .add_comment(&app.ctx(&commenter), post.id, "first!")
        .await
        .unwrap();
    app.comment_service
        .add_reply(&app.ctx(&owner), post.id, comment.id, "welcome")
        .await
        .unwrap();

    // The post counts comments and replies together; the comment counts
    // its replies.
    let item = app
        .post_service
        .get_post(&app.ctx(&owner), post.id)
        .await
        .unwrap();
    assert_eq!(item.post.comments, 2);

    let page = PageRequest::new(1, 30);
    let comments = app
        .comment_service
        .list_comments(&app.ctx(&owner), post.id, &page)
        .await
        .unwrap();
    assert_eq!(comments.items.len(), 1);
    assert_eq!(comments.items[0].reply_count, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn reply_notifies_post_creator_and_comment_author_but_never_the_actor() {
    let app = TestApp::new().await;
    let creator = app.create_user("cr").await;
    let commenter = app.create_user("co").await;
    let replier = app.create_user("re").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&creator), Some("hello"), Vec::new(), "public")
        .await
        .unwrap();
    let comment = app
        .comment_service
        .add_comment(&app.ctx(&commenter), post.id, "hi")
        .await
        .unwrap();

    let reply = app
        .comment_service
        .add_reply(&app.ctx(&replier), post.id, comment.id, "hey both")
        .await
        .unwrap();

    let creator_inbox = app.fanout.list_for(creator.id).await.unwrap();
    assert!(
        creator_inbox
            .iter()
            .any(|n| n.payload.reply_id == Some(reply.id))
    );
    let commenter_inbox = app.fanout.list_for(commenter.id).await.unwrap();
    assert!(
        commenter_inbox
            .iter()
            .any(|n| n.payload.reply_id == Some(reply.id))
    );
    assert!(app.fanout.list_for(replier.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn deleting_a_comment_cascades_to_its_replies() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("hello"), Vec::new(), "public")
        .await
        .unwrap();
    let comment = app
        .comment_service
        .add_comment(&app.ctx(&owner), post.id, "thread root")
        .await
        .unwrap();
    let reply = app
        .comment_service
        .add_reply(&app.ctx(&owner), post.id, comment.id, "nested")
        .await
        .unwrap();

    app.comment_service
        .delete_comment(&app.ctx(&owner), comment.id)
        .await
        .unwrap();

    let page = PageRequest::new(1, 30);
    let err = app
        .comment_service
        .list_replies(&app.ctx(&owner), comment.id, &page)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .comment_service
        .delete_reply(&app.ctx(&owner), reply.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn only_authors_may_edit_their_comments_and_replies() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let other = app.create_user("x").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("hello"), Vec::new(), "public")
        .await
        .unwrap();
    let comment = app
        .comment_service
        .add_comment(&app.ctx(&owner), post.id, "mine")
        .await
        .unwrap();

    let err = app
        .comment_service
        .edit_comment(&app.ctx(&other), comment.id, "hijack")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    app.comment_service
        .edit_comment(&app.ctx(&owner), comment.id, "mine, edited")
        .await
        .unwrap();

    let reply = app
        .comment_service
        .add_reply(&app.ctx(&owner), post.id, comment.id, "self reply")
        .await
        .unwrap();
    let err = app
        .comment_service
        .edit_reply(&app.ctx(&other), reply.id, "hijack")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn commenting_respects_post_visibility() {
    let app = TestApp::new().await;
    let owner = app.create_user("o").await;
    let stranger = app.create_user("s").await;

    let post = app
        .post_service
        .create_post(&app.ctx(&owner), Some("inner circle"), Vec::new(), "followers")
        .await
        .unwrap();

    let err = app
        .comment_service
        .add_comment(&app.ctx(&stranger), post.id, "let me in")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    app.graph
        .follow(&app.ctx(&stranger), &owner.username)
        .await
        .unwrap();
    app.comment_service
        .add_comment(&app.ctx(&stranger), post.id, "hello from a follower")
        .await
        .unwrap();
}
