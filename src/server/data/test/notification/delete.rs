use super::*;

/// Tests deleting own and foreign notifications.
///
/// Expected: Ok(false) for a foreign user, Ok(true) for the recipient
#[tokio::test]
async fn deletes_only_own_notification() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let other = factory::user::create_user(db).await?;
    let notification =
        factory::notification::create_notification(db, owner.id, "new_follower").await?;

    let repo = NotificationRepository::new(db);

    assert!(!repo.delete(other.id, notification.id).await?);
    assert!(repo.delete(owner.id, notification.id).await?);
    assert_eq!(repo.unread_count(owner.id).await?, 0);

    Ok(())
}
