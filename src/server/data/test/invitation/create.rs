use super::*;

/// Tests creating an invitation and reading it back by token.
///
/// Expected: Ok with a pending invitation and details carrying the organization name
#[tokio::test]
async fn creates_pending_invitation() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;

    let repo = InvitationRepository::new(db);
    let invitation = repo
        .create(CreateInvitationParam {
            organization_id: org.id,
            email: "ada@uni.example".to_string(),
            role: OrgRole::Instructor,
            token: "t".repeat(48),
            invited_by: owner.id,
            expires_at: Utc::now() + Duration::days(7),
        })
        .await?;

    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert!(invitation.responded_at.is_none());

    let details = repo.find_details_by_token(&"t".repeat(48)).await?.unwrap();
    assert_eq!(details.invitation.id, invitation.id);
    assert_eq!(details.organization_name, org.name);

    Ok(())
}

/// Tests that invitations to a deleted organization cannot be looked up for details.
///
/// Expected: Ok(None) from `find_details_by_token`, while `find_by_token` still sees the row
#[tokio::test]
async fn hides_details_of_deleted_organization() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::user::create_user(db).await?;
    let org = factory::organization::OrganizationFactory::new(db, owner.id)
        .deleted(true)
        .build()
        .await?;
    let invitation = factory::create_invitation(db, org.id, owner.id, "x@uni.example").await?;

    let repo = InvitationRepository::new(db);

    assert!(repo.find_details_by_token(&invitation.token).await?.is_none());
    assert!(repo.find_by_token(&invitation.token).await?.is_some());

    Ok(())
}

/// Tests finding the open invitation for an address.
///
/// Verifies that expired pending rows no longer count as open.
///
/// Expected: Ok(Some) for the live invitation, Ok(None) for the lapsed one
#[tokio::test]
async fn finds_only_open_invitation() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    factory::create_invitation(db, org.id, owner.id, "live@uni.example").await?;
    InvitationFactory::new(db, org.id, owner.id)
        .email("late@uni.example")
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

    let repo = InvitationRepository::new(db);
    let now = Utc::now();

    assert!(repo.find_open(org.id, "live@uni.example", now).await?.is_some());
    assert!(repo.find_open(org.id, "late@uni.example", now).await?.is_none());
    assert_eq!(repo.list_open_for_email("live@uni.example", now).await?.len(), 1);
    assert!(repo.list_open_for_email("late@uni.example", now).await?.is_empty());

    Ok(())
}
