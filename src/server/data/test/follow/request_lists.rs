use super::*;

/// Tests incoming and outgoing request lists.
///
/// Verifies that only pending requests are listed on either side.
///
/// Expected: Ok with one incoming request for the target and one outgoing for the requester
#[tokio::test]
async fn lists_only_pending_requests() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_social_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let target = factory::user::create_private_user(db).await?;
    let alice = factory::user::create_user(db).await?;
    let bob = factory::user::create_user(db).await?;

    let pending = factory::create_follow_request(db, alice.id, target.id, "pending").await?;
    factory::create_follow_request(db, bob.id, target.id, "cancelled").await?;

    let repo = FollowRequestRepository::new(db);

    let incoming = repo.incoming(target.id, PageRequest::new(0, 10)).await?;
    assert_eq!(incoming.items.len(), 1);
    assert_eq!(incoming.items[0].id, pending.id);

    let outgoing = repo.outgoing(alice.id, PageRequest::new(0, 10)).await?;
    assert_eq!(outgoing.items.len(), 1);
    assert!(repo
        .outgoing(bob.id, PageRequest::new(0, 10))
        .await?
        .items
        .is_empty());

    let all_pending = repo.pending_for_target(target.id).await?;
    assert_eq!(all_pending.len(), 1);

    Ok(())
}
