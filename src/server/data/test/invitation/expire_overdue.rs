use super::*;

/// Tests the expiry sweep.
///
/// Verifies that only pending rows past their expiry change, and that accepted rows
/// past their expiry keep their status.
///
/// Expected: Ok(1) on the first sweep and Ok(0) on the second
#[tokio::test]
async fn expires_only_overdue_pending_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let past = Utc::now() - Duration::hours(1);
    let overdue = InvitationFactory::new(db, org.id, owner.id)
        .expires_at(past)
        .build()
        .await?;
    let accepted = InvitationFactory::new(db, org.id, owner.id)
        .status("accepted")
        .expires_at(past)
        .build()
        .await?;
    let live = factory::create_invitation(db, org.id, owner.id, "live@uni.example").await?;

    let repo = InvitationRepository::new(db);

    assert_eq!(repo.expire_overdue(Utc::now()).await?, 1);
    assert_eq!(repo.expire_overdue(Utc::now()).await?, 0);

    for (id, expected) in [
        (overdue.id, InvitationStatus::Expired),
        (accepted.id, InvitationStatus::Accepted),
        (live.id, InvitationStatus::Pending),
    ] {
        let stored = repo.find_by_id(id).await?.unwrap();
        assert_eq!(stored.status, expected);
    }

    Ok(())
}
