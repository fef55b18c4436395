use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResearchDto {
    pub id: i32,
    pub owner_id: i32,
    pub organization_id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub field: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResearchDetailsDto {
    pub research: ResearchDto,
    pub owner: UserDto,
    /// Accepted collaborators only.
    pub collaborators: Vec<UserDto>,
}

/// Body for creating or updating a research project.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResearchFormDto {
    pub organization_id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub field: Option<String>,
    /// `recruiting`, `active` or `completed`; defaults to `recruiting` on create.
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct ResearchFilterParams {
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CollaboratorDto {
    pub research_id: i32,
    pub user: UserDto,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CollaborationRequestDto {
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CollaborationResponseDto {
    pub accept: bool,
}
