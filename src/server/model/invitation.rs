//! Token based invitations to join an organization.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::invitation::{InvitationDetailsDto, InvitationDto},
    server::{
        model::organization::OrgRole,
        util::parse::{parse_stored, StoredEnum},
    },
};

/// Lifecycle of an invitation.
///
/// ```text
/// PENDING ──accept───▶ ACCEPTED
///    │ ────decline──▶ DECLINED
///    │ ────cancel───▶ CANCELLED
///    └─────expiry───▶ EXPIRED ──resend──▶ PENDING
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Expired,
}

impl StoredEnum for InvitationStatus {
    const KIND: &'static str = "invitation status";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Accepted,
        Self::Declined,
        Self::Cancelled,
        Self::Expired,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl InvitationStatus {
    /// Pending and expired invitations can be re-issued with a fresh token.
    pub fn can_resend(self) -> bool {
        matches!(self, Self::Pending | Self::Expired)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub id: i32,
    pub organization_id: i32,
    pub email: String,
    pub role: OrgRole,
    pub token: String,
    /// Status as stored; see `effective_status` for reads.
    pub status: InvitationStatus,
    pub invited_by: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn from_entity(entity: entity::invitation::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            organization_id: entity.organization_id,
            email: entity.email,
            role: parse_stored(&entity.role)?,
            token: entity.token,
            status: parse_stored(&entity.status)?,
            invited_by: entity.invited_by,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        })
    }

    /// Status as observed at `now`: a pending invitation past `expires_at` is expired
    /// even before the cleanup sweep rewrites the row.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        match self.status {
            InvitationStatus::Pending if self.expires_at <= now => InvitationStatus::Expired,
            status => status,
        }
    }

    pub fn into_dto(self, now: DateTime<Utc>) -> InvitationDto {
        InvitationDto {
            id: self.id,
            organization_id: self.organization_id,
            status: self.effective_status(now).as_str().to_string(),
            email: self.email,
            role: self.role.as_str().to_string(),
            invited_by: self.invited_by,
            expires_at: self.expires_at,
            created_at: self.created_at,
            responded_at: self.responded_at,
        }
    }
}

/// Invitation joined with the name of the inviting organization.
#[derive(Debug, Clone, PartialEq)]
pub struct InvitationDetails {
    pub invitation: Invitation,
    pub organization_name: String,
}

impl InvitationDetails {
    pub fn into_dto(self, now: DateTime<Utc>) -> InvitationDetailsDto {
        InvitationDetailsDto {
            organization_id: self.invitation.organization_id,
            organization_name: self.organization_name,
            status: self.invitation.effective_status(now).as_str().to_string(),
            email: self.invitation.email,
            role: self.invitation.role.as_str().to_string(),
            expires_at: self.invitation.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateInvitationParam {
    pub organization_id: i32,
    /// Normalized (trimmed, lowercase) address.
    pub email: String,
    pub role: OrgRole,
    pub token: String,
    pub invited_by: i32,
    pub expires_at: DateTime<Utc>,
}
