use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct InvitationDto {
    pub id: i32,
    pub organization_id: i32,
    pub email: String,
    pub role: String,
    /// Effective status; pending invitations past their expiry read as `expired`.
    pub status: String,
    pub invited_by: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Invitation as seen through its token link.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct InvitationDetailsDto {
    pub organization_id: i32,
    pub organization_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateInvitationDto {
    pub email: String,
    /// `admin`, `instructor` or `member`.
    pub role: String,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct InvitationFilterParams {
    /// Only list invitations with this effective status.
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CleanupResultDto {
    pub expired: u64,
}
