use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

/// Result of a follow attempt.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct FollowResultDto {
    /// `following` when the edge was created, `pending` when a request awaits approval.
    pub status: String,
    pub request_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct FollowRequestDto {
    pub id: i32,
    pub requester_id: i32,
    pub target_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    /// The other party: the requester for incoming requests, the target for outgoing ones.
    pub user: UserDto,
}
