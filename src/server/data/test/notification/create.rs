use super::*;

/// Tests creating a notification with actor and link.
///
/// Expected: Ok with an unread notification listed for the recipient
#[tokio::test]
async fn creates_unread_notification() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let recipient = factory::user::create_user(db).await?;
    let actor = factory::user::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    let notification = repo
        .create(
            CreateNotificationParam::new(
                recipient.id,
                actor.id,
                NotificationKind::NewFollower,
                "Someone followed you".to_string(),
            )
            .link(format!("/users/{}", actor.id)),
        )
        .await?;

    assert_eq!(notification.kind, NotificationKind::NewFollower);
    assert_eq!(notification.actor_id, Some(actor.id));
    assert!(notification.read_at.is_none());

    let page = repo.list(recipient.id, false, PageRequest::new(0, 10)).await?;
    assert_eq!(page.total, 1);
    assert_eq!(repo.unread_count(recipient.id).await?, 1);
    assert_eq!(repo.unread_count(actor.id).await?, 0);

    Ok(())
}
