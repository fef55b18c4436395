use super::*;

/// Tests filtering an organization's invitations by effective status.
///
/// Verifies that a pending row past its expiry is listed as expired rather than pending.
///
/// Expected: Ok with one pending, two expired and one accepted invitation
#[tokio::test]
async fn filters_by_effective_status() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    factory::create_invitation(db, org.id, owner.id, "a@uni.example").await?;
    InvitationFactory::new(db, org.id, owner.id)
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    InvitationFactory::new(db, org.id, owner.id)
        .status("expired")
        .build()
        .await?;
    InvitationFactory::new(db, org.id, owner.id)
        .status("accepted")
        .build()
        .await?;

    let repo = InvitationRepository::new(db);
    let now = Utc::now();
    let page = PageRequest::new(0, 10);

    let mut totals = Vec::new();
    for status in [
        None,
        Some(InvitationStatus::Pending),
        Some(InvitationStatus::Expired),
        Some(InvitationStatus::Accepted),
        Some(InvitationStatus::Declined),
    ] {
        let listed = repo.list_for_organization(org.id, status, now, page).await?;
        totals.push(listed.total);
    }

    assert_eq!(totals, vec![4, 1, 2, 1, 0]);

    Ok(())
}
