use super::*;
use crate::server::{
    data::{invitation::InvitationRepository, organization::MemberRepository},
    model::{invitation::InvitationStatus, organization::OrgRole},
    service::{
        invitation::{InvitationService, INVITATION_TOKEN_LENGTH},
        mail::MailService,
    },
};

const APP_URL: &str = "http://localhost:8080";

/// Tests inviting a new email and inviting it again.
///
/// Expected: pending invitation with a fresh token and a 72h expiry, then Conflict
#[tokio::test]
async fn creates_invitation_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let owner = User::from_entity(owner);

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    let invitation = service
        .create(&owner, org.id, " New.Person@Example.edu ", OrgRole::Instructor)
        .await?;

    assert_eq!(invitation.email, "new.person@example.edu");
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.role, OrgRole::Instructor);
    assert_eq!(invitation.token.len(), INVITATION_TOKEN_LENGTH);
    assert!(invitation.expires_at > Utc::now() + Duration::hours(71));
    assert!(invitation.expires_at <= Utc::now() + Duration::hours(72));

    let again = service
        .create(&owner, org.id, "new.person@example.edu", OrgRole::Member)
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests the guards on creating invitations.
///
/// Expected: Forbidden for plain members, BadRequest for the owner role and bad emails
#[tokio::test]
async fn guards_invitation_creation() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let owner = User::from_entity(owner);
    let member = User::from_entity(
        factory::helpers::create_user_with_role(db, org.id, "member").await?,
    );

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    let by_member = service
        .create(&member, org.id, "someone@example.edu", OrgRole::Member)
        .await;
    assert!(matches!(by_member, Err(AppError::Forbidden(_))));

    let as_owner = service
        .create(&owner, org.id, "someone@example.edu", OrgRole::Owner)
        .await;
    assert!(matches!(as_owner, Err(AppError::BadRequest(_))));

    let bad_email = service
        .create(&owner, org.id, "not-an-email", OrgRole::Member)
        .await;
    assert!(matches!(bad_email, Err(AppError::BadRequest(_))));

    let existing = service
        .create(&owner, org.id, &owner.email, OrgRole::Member)
        .await;
    assert!(matches!(existing, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests accepting an invitation addressed to the actor.
///
/// Expected: membership with the invited role and the inviter notified
#[tokio::test]
async fn accept_joins_organization() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitee = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("invitee@example.edu")
            .build()
            .await?,
    );
    let invitation = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("invitee@example.edu")
        .role("instructor")
        .build()
        .await?;

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    let accepted = service.accept(&invitee, &invitation.token).await?;
    assert_eq!(accepted.status, InvitationStatus::Accepted);
    assert!(accepted.responded_at.is_some());

    let membership = MemberRepository::new(db)
        .find(org.id, invitee.id)
        .await?
        .unwrap();
    assert_eq!(membership.role, OrgRole::Instructor);
    assert_eq!(
        notification_kinds(db, owner.id).await?,
        vec![NotificationKind::InvitationAccepted]
    );

    let again = service.accept(&invitee, &invitation.token).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests accepting an invitation meant for another email.
///
/// Expected: Err(AppError::Forbidden) and no membership
#[tokio::test]
async fn accept_requires_matching_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let other = User::from_entity(factory::user::create_user(db).await?);
    let invitation = factory::create_invitation(db, org.id, owner.id, "someone@example.edu").await?;

    let mail = MailService::disabled();
    let result = InvitationService::new(db, &mail, APP_URL, 72)
        .accept(&other, &invitation.token)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(MemberRepository::new(db).find(org.id, other.id).await?.is_none());

    Ok(())
}

/// Tests accepting an invitation past its expiry.
///
/// Expected: Conflict, and the stored row is flipped to expired
#[tokio::test]
async fn accept_expired_marks_row() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitee = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("late@example.edu")
            .build()
            .await?,
    );
    let invitation = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("late@example.edu")
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

    let mail = MailService::disabled();
    let result = InvitationService::new(db, &mail, APP_URL, 72)
        .accept(&invitee, &invitation.token)
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = InvitationRepository::new(db)
        .find_by_id(invitation.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, InvitationStatus::Expired);
    assert!(MemberRepository::new(db).find(org.id, invitee.id).await?.is_none());

    Ok(())
}

/// Tests re-sending an expired invitation.
///
/// Expected: pending again with a new token and a future expiry
#[tokio::test]
async fn resend_reissues_expired_invitation() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitation = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .status("expired")
        .expires_at(Utc::now() - Duration::days(1))
        .build()
        .await?;

    let mail = MailService::disabled();
    let reissued = InvitationService::new(db, &mail, APP_URL, 72)
        .resend(&User::from_entity(owner), invitation.id)
        .await?;

    assert_eq!(reissued.status, InvitationStatus::Pending);
    assert_ne!(reissued.token, invitation.token);
    assert!(reissued.expires_at > Utc::now());

    Ok(())
}

/// Tests that an accepted invitation cannot be cancelled.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn cancel_requires_pending() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitation = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .status("accepted")
        .build()
        .await?;

    let mail = MailService::disabled();
    let result = InvitationService::new(db, &mail, APP_URL, 72)
        .cancel(&User::from_entity(owner), invitation.id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests the periodic sweep over overdue invitations.
///
/// Expected: only the overdue pending invitation is expired
#[tokio::test]
async fn cleanup_expires_overdue_only() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let overdue = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .expires_at(Utc::now() - Duration::minutes(5))
        .build()
        .await?;
    let fresh = factory::create_invitation(db, org.id, owner.id, "someone@example.edu").await?;

    let mail = MailService::disabled();
    let expired = InvitationService::new(db, &mail, APP_URL, 72)
        .cleanup_expired()
        .await?;
    assert_eq!(expired, 1);

    let repo = InvitationRepository::new(db);
    let overdue = repo.find_by_id(overdue.id).await?.unwrap();
    let fresh = repo.find_by_id(fresh.id).await?.unwrap();
    assert_eq!(overdue.status, InvitationStatus::Expired);
    assert_eq!(fresh.status, InvitationStatus::Pending);

    Ok(())
}

/// Tests the link mailed to invitees.
///
/// Expected: app URL followed by the token path
#[tokio::test]
async fn builds_invitation_link() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    assert_eq!(
        service.invitation_link("abc"),
        "http://localhost:8080/invitations/abc"
    );

    Ok(())
}

/// Tests re-sending an expired invitation after a newer one was issued to the same email.
///
/// Expected: Err(AppError::Conflict), the old row stays expired
#[tokio::test]
async fn resend_rejects_when_newer_invitation_is_open() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let owner = User::from_entity(owner);
    let old = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("dup@example.edu")
        .status("expired")
        .expires_at(Utc::now() - Duration::days(1))
        .build()
        .await?;

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);
    service
        .create(&owner, org.id, "dup@example.edu", OrgRole::Member)
        .await?;

    let result = service.resend(&owner, old.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = InvitationRepository::new(db).find_by_id(old.id).await?.unwrap();
    assert_eq!(stored.status, InvitationStatus::Expired);
    assert_eq!(stored.token, old.token);

    Ok(())
}

/// Tests re-sending an expired invitation to an email that has joined since.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn resend_rejects_when_email_joined() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let joined = factory::user::UserFactory::new(db)
        .email("joined@example.edu")
        .build()
        .await?;
    factory::organization::create_member(db, org.id, joined.id, "member").await?;
    let old = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("joined@example.edu")
        .status("expired")
        .expires_at(Utc::now() - Duration::days(1))
        .build()
        .await?;

    let mail = MailService::disabled();
    let result = InvitationService::new(db, &mail, APP_URL, 72)
        .resend(&User::from_entity(owner), old.id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests declining an invitation addressed to the actor, then declining again.
///
/// Expected: declined with a response time and no membership, then Conflict
#[tokio::test]
async fn decline_closes_invitation() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitee = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("invitee@example.edu")
            .build()
            .await?,
    );
    let invitation =
        factory::create_invitation(db, org.id, owner.id, "invitee@example.edu").await?;

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    let declined = service.decline(&invitee, &invitation.token).await?;
    assert_eq!(declined.status, InvitationStatus::Declined);
    assert!(declined.responded_at.is_some());
    assert!(MemberRepository::new(db).find(org.id, invitee.id).await?.is_none());

    let again = service.decline(&invitee, &invitation.token).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests the guards on declining.
///
/// Expected: Forbidden for another email, NotFound for an unknown token,
/// Conflict and an expired row for an overdue invitation
#[tokio::test]
async fn decline_guards() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitee = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("late@example.edu")
            .build()
            .await?,
    );
    let other = User::from_entity(factory::user::create_user(db).await?);
    let overdue = factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("late@example.edu")
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, 72);

    let by_other = service.decline(&other, &overdue.token).await;
    assert!(matches!(by_other, Err(AppError::Forbidden(_))));

    let unknown = service.decline(&invitee, "no-such-token").await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let late = service.decline(&invitee, &overdue.token).await;
    assert!(matches!(late, Err(AppError::Conflict(_))));

    let stored = InvitationRepository::new(db)
        .find_by_id(overdue.id)
        .await?
        .unwrap();
    assert_eq!(stored.status, InvitationStatus::Expired);

    Ok(())
}

/// Tests listing the invitations addressed to the actor.
///
/// Expected: only the pending, unexpired invitation to the actor's email, with the
/// organization name
#[tokio::test]
async fn list_mine_returns_open_invitations_for_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, org) = factory::helpers::create_organization_with_owner(db).await?;
    let invitee = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("Me@Example.edu")
            .build()
            .await?,
    );

    let open = factory::create_invitation(db, org.id, owner.id, "me@example.edu").await?;
    factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("me@example.edu")
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    factory::invitation::InvitationFactory::new(db, org.id, owner.id)
        .email("me@example.edu")
        .status("declined")
        .build()
        .await?;
    factory::create_invitation(db, org.id, owner.id, "someone.else@example.edu").await?;

    let mail = MailService::disabled();
    let mine = InvitationService::new(db, &mail, APP_URL, 72)
        .list_mine(&invitee)
        .await?;

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].invitation.id, open.id);
    assert_eq!(mine[0].organization_name, org.name);

    Ok(())
}

/// Tests building the service with an out-of-range expiry.
///
/// Expected: the expiry is capped at the configured maximum instead of overflowing
#[tokio::test]
async fn caps_oversized_ttl() -> Result<(), AppError> {
    let test = TestBuilder::new().with_organization_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mail = MailService::disabled();
    let service = InvitationService::new(db, &mail, APP_URL, i64::MAX);

    assert_eq!(
        service.ttl,
        Duration::hours(crate::server::config::MAX_INVITATION_TTL_HOURS)
    );

    Ok(())
}
