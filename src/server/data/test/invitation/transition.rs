use super::*;

/// Tests a guarded transition out of pending.
///
/// Expected: Ok(true) the first time, Ok(false) once the row has left pending
#[tokio::test]
async fn transitions_only_from_expected_status() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitation = factory::create_invitation(db, org.id, owner.id, "a@uni.example").await?;

    let repo = InvitationRepository::new(db);

    assert!(
        repo.transition(invitation.id, InvitationStatus::Pending, InvitationStatus::Accepted)
            .await?
    );
    assert!(
        !repo
            .transition(invitation.id, InvitationStatus::Pending, InvitationStatus::Declined)
            .await?
    );

    let stored = repo.find_by_id(invitation.id).await?.unwrap();
    assert_eq!(stored.status, InvitationStatus::Accepted);
    assert!(stored.responded_at.is_some());

    Ok(())
}

/// Tests re-issuing an expired invitation.
///
/// Expected: Ok with a pending invitation, the new token and expiry, and no response time
#[tokio::test]
async fn reissues_with_fresh_token() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitation = InvitationFactory::new(db, org.id, owner.id)
        .status("expired")
        .expires_at(Utc::now() - Duration::days(1))
        .build()
        .await?;

    let repo = InvitationRepository::new(db);
    let expires_at = Utc::now() + Duration::days(7);
    let reissued = repo
        .reissue(invitation.id, "n".repeat(48), expires_at)
        .await?;

    assert_eq!(reissued.status, InvitationStatus::Pending);
    assert_eq!(reissued.token, "n".repeat(48));
    assert!(reissued.responded_at.is_none());
    assert!(repo.find_by_token(&invitation.token).await?.is_none());

    Ok(())
}

/// Tests re-issuing a missing invitation.
///
/// Expected: Err(DbErr::RecordNotFound)
#[tokio::test]
async fn reissue_fails_for_missing_invitation() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = InvitationRepository::new(db);
    let result = repo
        .reissue(999, "n".repeat(48), Utc::now() + Duration::days(7))
        .await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
