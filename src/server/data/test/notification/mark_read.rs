use super::*;

/// Tests marking a single notification read.
///
/// Expected: Ok(Some) with `read_at` set, and unread filtering excludes it
#[tokio::test]
async fn marks_own_notification_read() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;
    let first = factory::notification::create_notification(db, user.id, "post_liked").await?;
    factory::notification::create_notification(db, user.id, "post_commented").await?;

    let repo = NotificationRepository::new(db);
    let read = repo.mark_read(user.id, first.id).await?;

    assert!(read.and_then(|n| n.read_at).is_some());
    let unread = repo.list(user.id, true, PageRequest::new(0, 10)).await?;
    assert_eq!(unread.total, 1);

    Ok(())
}

/// Tests that users cannot mark other users' notifications.
///
/// Expected: Ok(None) and the notification stays unread
#[tokio::test]
async fn ignores_foreign_notification() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let other = factory::user::create_user(db).await?;
    let notification =
        factory::notification::create_notification(db, owner.id, "post_liked").await?;

    let repo = NotificationRepository::new(db);

    assert!(repo.mark_read(other.id, notification.id).await?.is_none());
    assert_eq!(repo.unread_count(owner.id).await?, 1);

    Ok(())
}

/// Tests marking everything read.
///
/// Expected: Ok(2) the first time and Ok(0) the second
#[tokio::test]
async fn marks_all_read_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;
    factory::notification::create_notification(db, user.id, "post_liked").await?;
    factory::notification::create_notification(db, user.id, "new_follower").await?;

    let repo = NotificationRepository::new(db);

    assert_eq!(repo.mark_all_read(user.id).await?, 2);
    assert_eq!(repo.mark_all_read(user.id).await?, 0);
    assert_eq!(repo.unread_count(user.id).await?, 0);

    Ok(())
}
