//! Organization invitations: issue, respond, revoke, re-send and expire.
//!
//! Expiry is evaluated lazily on read (`Invitation::effective_status`) and persisted
//! either when someone touches an overdue invitation or by the periodic sweep.

use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    config::MAX_INVITATION_TTL_HOURS,
    data::{
        audit::AuditRepository, invitation::InvitationRepository,
        notification::NotificationRepository, organization::MemberRepository,
    },
    error::AppError,
    model::{
        audit::{entity_type, RecordAuditParam},
        invitation::{CreateInvitationParam, Invitation, InvitationDetails, InvitationStatus},
        notification::{CreateNotificationParam, NotificationKind},
        organization::{OrgRole, Organization},
        user::User,
        PageRequest, Paginated,
    },
    service::{
        mail::{invitation_message, MailService},
        organization::{find_organization, require_org_role},
    },
    util::{
        parse::{is_valid_email, normalize_email, StoredEnum},
        token::random_alphanumeric,
    },
};

/// Length of the random token embedded in invitation links.
pub const INVITATION_TOKEN_LENGTH: usize = 48;

pub struct InvitationService<'a> {
    pub db: &'a DatabaseConnection,
    pub mail_service: &'a MailService,
    /// Public base URL, without trailing slash, used to build invitation links.
    pub app_url: &'a str,
    pub ttl: Duration,
}

impl<'a> InvitationService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        mail_service: &'a MailService,
        app_url: &'a str,
        ttl_hours: i64,
    ) -> Self {
        Self {
            db,
            mail_service,
            app_url,
            ttl: Duration::try_hours(ttl_hours.clamp(1, MAX_INVITATION_TTL_HOURS))
                .unwrap_or_else(|| Duration::days(7)),
        }
    }

    /// Invites `email` to join the organization with `role`.
    ///
    /// The invitation email is sent after the row is committed. Delivery failures are
    /// logged and do not fail the request, since the invitation can be re-sent.
    ///
    /// # Returns
    /// - `Ok(Invitation)` - The pending invitation
    /// - `Err(AppError::Forbidden)` - Actor is not an owner or admin of the organization
    /// - `Err(AppError::BadRequest)` - Invalid email, or the owner role was requested
    /// - `Err(AppError::Conflict)` - Already a member, or an open invitation exists
    pub async fn create(
        &self,
        actor: &User,
        organization_id: i32,
        email: &str,
        role: OrgRole,
    ) -> Result<Invitation, AppError> {
        let organization = find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization.id, actor.id, OrgRole::is_manager).await?;

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if !role.is_invitable() {
            return Err(AppError::BadRequest(
                "The owner role cannot be granted by invitation".to_string(),
            ));
        }

        if MemberRepository::new(self.db)
            .find_by_email(organization.id, &email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This user is already a member".to_string(),
            ));
        }

        let now = Utc::now();
        if InvitationRepository::new(self.db)
            .find_open(organization.id, &email, now)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An open invitation already exists for this email".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let invitation = InvitationRepository::new(&txn)
            .create(CreateInvitationParam {
                organization_id: organization.id,
                email,
                role,
                token: random_alphanumeric(INVITATION_TOKEN_LENGTH),
                invited_by: actor.id,
                expires_at: now + self.ttl,
            })
            .await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor.id,
                    "invitation.created",
                    entity_type::INVITATION,
                    invitation.id,
                )
                .details(serde_json::json!({
                    "organization_id": organization.id,
                    "email": invitation.email,
                    "role": role.as_str(),
                })),
            )
            .await?;
        txn.commit().await?;

        self.send_invitation(&invitation, &organization).await;

        Ok(invitation)
    }

    pub async fn list_for_organization(
        &self,
        actor: &User,
        organization_id: i32,
        status: Option<InvitationStatus>,
        page: PageRequest,
    ) -> Result<Paginated<Invitation>, AppError> {
        find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;

        Ok(InvitationRepository::new(self.db)
            .list_for_organization(organization_id, status, Utc::now(), page)
            .await?)
    }

    /// Open invitations addressed to the actor's email.
    pub async fn list_mine(&self, actor: &User) -> Result<Vec<InvitationDetails>, AppError> {
        Ok(InvitationRepository::new(self.db)
            .list_open_for_email(&normalize_email(&actor.email), Utc::now())
            .await?)
    }

    pub async fn get_by_token(&self, token: &str) -> Result<InvitationDetails, AppError> {
        InvitationRepository::new(self.db)
            .find_details_by_token(token)
            .await?
            .ok_or_else(not_found)
    }

    /// Accepts the invitation and joins the organization.
    ///
    /// # Returns
    /// - `Ok(Invitation)` - The accepted invitation
    /// - `Err(AppError::NotFound)` - Unknown token or deleted organization
    /// - `Err(AppError::Forbidden)` - The invitation is addressed to another email
    /// - `Err(AppError::Conflict)` - Expired, already answered, or already a member
    pub async fn accept(&self, actor: &User, token: &str) -> Result<Invitation, AppError> {
        let invitation = self.find_addressed_to(actor, token).await?;
        self.ensure_pending(&invitation).await?;

        let member_repo = MemberRepository::new(self.db);
        if member_repo
            .find(invitation.organization_id, actor.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You are already a member of this organization".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let invitation_repo = InvitationRepository::new(&txn);
        if !invitation_repo
            .transition(
                invitation.id,
                InvitationStatus::Pending,
                InvitationStatus::Accepted,
            )
            .await?
        {
            return Err(not_pending());
        }
        MemberRepository::new(&txn)
            .add(invitation.organization_id, actor.id, invitation.role)
            .await?;
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    invitation.invited_by,
                    actor.id,
                    NotificationKind::InvitationAccepted,
                    format!("{} accepted your invitation", actor.name),
                )
                .link(format!("/organizations/{}", invitation.organization_id)),
            )
            .await?;
        AuditRepository::new(&txn)
            .record(RecordAuditParam::new(
                actor.id,
                "invitation.accepted",
                entity_type::INVITATION,
                invitation.id,
            ))
            .await?;
        txn.commit().await?;

        tracing::info!(
            "User {} joined organization {} via invitation {}",
            actor.id,
            invitation.organization_id,
            invitation.id
        );

        self.reload(invitation.id).await
    }

    pub async fn decline(&self, actor: &User, token: &str) -> Result<Invitation, AppError> {
        let invitation = self.find_addressed_to(actor, token).await?;
        self.ensure_pending(&invitation).await?;

        self.close(&invitation, InvitationStatus::Declined).await?;

        self.reload(invitation.id).await
    }

    /// Revokes a pending invitation. Owners and admins only.
    pub async fn cancel(&self, actor: &User, invitation_id: i32) -> Result<Invitation, AppError> {
        let invitation = self.find_managed(actor, invitation_id).await?;
        self.ensure_pending(&invitation).await?;

        let txn = self.db.begin().await?;
        if !InvitationRepository::new(&txn)
            .transition(
                invitation.id,
                InvitationStatus::Pending,
                InvitationStatus::Cancelled,
            )
            .await?
        {
            return Err(not_pending());
        }
        AuditRepository::new(&txn)
            .record(RecordAuditParam::new(
                actor.id,
                "invitation.cancelled",
                entity_type::INVITATION,
                invitation.id,
            ))
            .await?;
        txn.commit().await?;

        self.reload(invitation.id).await
    }

    /// Issues a fresh token and expiry for a pending or expired invitation and mails it
    /// again.
    ///
    /// Fails with Conflict when the email has joined since, or when another open
    /// invitation for the same email was issued in the meantime.
    pub async fn resend(&self, actor: &User, invitation_id: i32) -> Result<Invitation, AppError> {
        let invitation = self.find_managed(actor, invitation_id).await?;
        if !invitation.status.can_resend() {
            return Err(AppError::Conflict(format!(
                "A {} invitation cannot be re-sent",
                invitation.status.as_str()
            )));
        }

        let organization = find_organization(self.db, invitation.organization_id).await?;

        if MemberRepository::new(self.db)
            .find_by_email(organization.id, &invitation.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This user is already a member".to_string(),
            ));
        }

        let other_open = InvitationRepository::new(self.db)
            .find_open(organization.id, &invitation.email, Utc::now())
            .await?
            .filter(|open| open.id != invitation.id);
        if other_open.is_some() {
            return Err(AppError::Conflict(
                "An open invitation already exists for this email".to_string(),
            ));
        }

        let reissued = InvitationRepository::new(self.db)
            .reissue(
                invitation.id,
                random_alphanumeric(INVITATION_TOKEN_LENGTH),
                Utc::now() + self.ttl,
            )
            .await?;

        self.send_invitation(&reissued, &organization).await;

        Ok(reissued)
    }

    /// Marks every overdue pending invitation as expired.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of invitations expired by this sweep
    pub async fn cleanup_expired(&self) -> Result<u64, AppError> {
        let expired = InvitationRepository::new(self.db)
            .expire_overdue(Utc::now())
            .await?;

        if expired > 0 {
            tracing::info!("Expired {} overdue invitations", expired);
        }

        Ok(expired)
    }

    /// Link the invitee opens to respond.
    pub fn invitation_link(&self, token: &str) -> String {
        format!("{}/invitations/{}", self.app_url, token)
    }

    async fn send_invitation(&self, invitation: &Invitation, organization: &Organization) {
        let message = invitation_message(
            &invitation.email,
            &organization.name,
            invitation.role.as_str(),
            &self.invitation_link(&invitation.token),
        );

        if let Err(e) = self.mail_service.send(&message).await {
            tracing::error!(
                "Failed to send invitation {} to {}: {}",
                invitation.id,
                invitation.email,
                e
            );
        }
    }

    async fn find_addressed_to(&self, actor: &User, token: &str) -> Result<Invitation, AppError> {
        let details = self.get_by_token(token).await?;
        let invitation = details.invitation;

        if normalize_email(&actor.email) != invitation.email {
            return Err(AppError::Forbidden(
                "This invitation was sent to a different email address".to_string(),
            ));
        }

        Ok(invitation)
    }

    async fn find_managed(&self, actor: &User, invitation_id: i32) -> Result<Invitation, AppError> {
        let invitation = InvitationRepository::new(self.db)
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(not_found)?;

        find_organization(self.db, invitation.organization_id).await?;
        require_org_role(
            self.db,
            invitation.organization_id,
            actor.id,
            OrgRole::is_manager,
        )
        .await?;

        Ok(invitation)
    }

    /// Fails unless the invitation is effectively pending.
    ///
    /// An overdue invitation is flipped to expired on the spot before the conflict is
    /// reported.
    async fn ensure_pending(&self, invitation: &Invitation) -> Result<(), AppError> {
        match invitation.effective_status(Utc::now()) {
            InvitationStatus::Pending => Ok(()),
            InvitationStatus::Expired => {
                if invitation.status == InvitationStatus::Pending {
                    InvitationRepository::new(self.db)
                        .transition(
                            invitation.id,
                            InvitationStatus::Pending,
                            InvitationStatus::Expired,
                        )
                        .await?;
                }
                Err(AppError::Conflict("Invitation has expired".to_string()))
            }
            _ => Err(not_pending()),
        }
    }

    async fn close(&self, invitation: &Invitation, to: InvitationStatus) -> Result<(), AppError> {
        let updated = InvitationRepository::new(self.db)
            .transition(invitation.id, InvitationStatus::Pending, to)
            .await?;

        if !updated {
            return Err(not_pending());
        }

        Ok(())
    }

    async fn reload(&self, invitation_id: i32) -> Result<Invitation, AppError> {
        InvitationRepository::new(self.db)
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(not_found)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Invitation not found".to_string())
}

fn not_pending() -> AppError {
    AppError::Conflict("Invitation is no longer pending".to_string())
}
