use super::*;
use crate::server::{model::CursorRequest, service::post::PostService};

fn first_page(limit: u64) -> CursorRequest {
    CursorRequest {
        before: None,
        limit,
    }
}

/// Tests that a private author's posts need a follow.
///
/// Expected: Forbidden for a stranger, visible to a follower
#[tokio::test]
async fn private_posts_need_follow() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_private_user(db).await?;
    let stranger = User::from_entity(factory::user::create_user(db).await?);
    let follower = User::from_entity(factory::user::create_user(db).await?);
    factory::create_follow(db, follower.id, author.id).await?;
    let post = factory::create_post(db, author.id).await?;

    let service = PostService::new(db);

    let hidden = service.get(&stranger, post.id).await;
    assert!(matches!(hidden, Err(AppError::Forbidden(_))));

    let view = service.get(&follower, post.id).await?;
    assert_eq!(view.post.id, post.id);
    assert_eq!(view.author.id, author.id);

    Ok(())
}

/// Tests the home feed across a cursor boundary.
///
/// Expected: own and followed posts newest first, nothing from strangers
#[tokio::test]
async fn feed_pages_followed_posts() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = User::from_entity(factory::user::create_user(db).await?);
    let bob = factory::user::create_user(db).await?;
    let carol = factory::user::create_user(db).await?;
    factory::create_follow(db, alice.id, bob.id).await?;

    let own = factory::create_post(db, alice.id).await?;
    let followed = factory::create_post(db, bob.id).await?;
    factory::create_post(db, carol.id).await?;

    let service = PostService::new(db);

    let first = service.feed(&alice, first_page(1)).await?;
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].post.id, followed.id);
    assert_eq!(first.next_cursor, Some(followed.id));

    let second = service
        .feed(
            &alice,
            CursorRequest {
                before: first.next_cursor,
                limit: 1,
            },
        )
        .await?;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].post.id, own.id);
    assert_eq!(second.next_cursor, None);

    Ok(())
}

/// Tests liking a post twice and the resulting counters.
///
/// Expected: author notified once, Conflict on the second like, unlike twice is NotFound
#[tokio::test]
async fn like_is_unique() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::user::create_user(db).await?;
    let fan = User::from_entity(factory::user::create_user(db).await?);
    let post = factory::create_post(db, author.id).await?;

    let service = PostService::new(db);
    service.like(&fan, post.id).await?;

    let again = service.like(&fan, post.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let view = service.get(&fan, post.id).await?;
    assert_eq!(view.like_count, 1);
    assert!(view.liked_by_viewer);
    assert_eq!(
        notification_kinds(db, author.id).await?,
        vec![NotificationKind::PostLiked]
    );

    service.unlike(&fan, post.id).await?;
    let missing = service.unlike(&fan, post.id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests commenting on one's own post.
///
/// Expected: comment stored and counted, no notification
#[tokio::test]
async fn self_comment_does_not_notify() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = User::from_entity(factory::user::create_user(db).await?);
    let post = factory::create_post(db, author.id).await?;

    let service = PostService::new(db);
    let comment = service
        .add_comment(&author, post.id, "  First!  ".to_string())
        .await?;
    assert_eq!(comment.comment.content, "First!");

    let view = service.get(&author, post.id).await?;
    assert_eq!(view.comment_count, 1);
    assert!(notification_kinds(db, author.id).await?.is_empty());

    Ok(())
}

/// Tests who may edit and delete posts.
///
/// Expected: Forbidden for other users, admins may delete, deleted posts are NotFound
#[tokio::test]
async fn edit_and_delete_rights() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = User::from_entity(factory::user::create_user(db).await?);
    let other = User::from_entity(factory::user::create_user(db).await?);
    let admin = User::from_entity(factory::user::create_admin(db).await?);
    let post = factory::create_post(db, author.id).await?;

    let service = PostService::new(db);

    let edit = service
        .update(&other, post.id, "Hijacked".to_string())
        .await;
    assert!(matches!(edit, Err(AppError::Forbidden(_))));

    let delete = service.delete(&other, post.id).await;
    assert!(matches!(delete, Err(AppError::Forbidden(_))));

    let edited = service
        .update(&author, post.id, "Edited".to_string())
        .await?;
    assert_eq!(edited.post.content, "Edited");

    service.delete(&admin, post.id).await?;
    let gone = service.get(&author, post.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests that blank posts are rejected.
///
/// Expected: Err(AppError::Validation)
#[tokio::test]
async fn rejects_blank_post() -> Result<(), AppError> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = User::from_entity(factory::user::create_user(db).await?);

    let result = PostService::new(db).create(&author, "   ".to_string()).await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    Ok(())
}
