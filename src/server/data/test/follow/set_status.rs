use super::*;

/// Tests moving a pending request to accepted.
///
/// Expected: Ok(true) with status and `responded_at` set
#[tokio::test]
async fn updates_pending_request() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_private_user(db).await?;
    let request = factory::create_follow_request(db, alice.id, bob.id, "pending").await?;

    let repo = FollowRequestRepository::new(db);
    assert!(repo.set_status(request.id, FollowRequestStatus::Accepted).await?);

    let stored = repo.find_by_id(request.id).await?.unwrap();
    assert_eq!(stored.status, FollowRequestStatus::Accepted);
    assert!(stored.responded_at.is_some());

    Ok(())
}

/// Tests that terminal requests are never overwritten.
///
/// Expected: Ok(false) and the stored status stays rejected
#[tokio::test]
async fn leaves_terminal_request_untouched() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_private_user(db).await?;
    let request = factory::create_follow_request(db, alice.id, bob.id, "rejected").await?;

    let repo = FollowRequestRepository::new(db);
    assert!(!repo.set_status(request.id, FollowRequestStatus::Accepted).await?);

    let stored = repo.find_by_id(request.id).await?.unwrap();
    assert_eq!(stored.status, FollowRequestStatus::Rejected);

    Ok(())
}

/// Tests that an unknown stored status surfaces as a type error.
///
/// Expected: Err(DbErr::Type)
#[tokio::test]
async fn rejects_unknown_stored_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_private_user(db).await?;
    let request = factory::create_follow_request(db, alice.id, bob.id, "maybe").await?;

    let repo = FollowRequestRepository::new(db);
    let result = repo.find_by_id(request.id).await;

    assert!(matches!(result, Err(DbErr::Type(_))));

    Ok(())
}
