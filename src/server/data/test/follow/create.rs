use super::*;

/// Tests creating a follow edge.
///
/// Expected: Ok with the edge visible through `exists` in one direction only
#[tokio::test]
async fn creates_directed_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;

    let repo = FollowRepository::new(db);
    repo.create(alice.id, bob.id).await?;

    assert!(repo.exists(alice.id, bob.id).await?);
    assert!(!repo.exists(bob.id, alice.id).await?);

    Ok(())
}

/// Tests that the composite key rejects a duplicate edge.
///
/// Expected: Err on the second insert
#[tokio::test]
async fn rejects_duplicate_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;

    let repo = FollowRepository::new(db);
    repo.create(alice.id, bob.id).await?;

    assert!(repo.create(alice.id, bob.id).await.is_err());

    Ok(())
}

/// Tests creating a follow request.
///
/// Expected: Ok with a pending request findable through `find_pending`
#[tokio::test]
async fn creates_pending_request() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_private_user(db).await?;

    let repo = FollowRequestRepository::new(db);
    let request = repo.create(alice.id, bob.id).await?;

    assert_eq!(request.status, FollowRequestStatus::Pending);
    assert!(request.responded_at.is_none());
    assert_eq!(
        repo.find_pending(alice.id, bob.id).await?.map(|r| r.id),
        Some(request.id)
    );

    Ok(())
}
