use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct OrganizationDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateOrganizationDto {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateOrganizationDto {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct MemberDto {
    pub user: UserDto,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateMemberRoleDto {
    /// `owner`, `admin`, `instructor` or `member`.
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SchoolDto {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for creating or updating a school or a faculty.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UnitDto {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct FacultyDto {
    pub id: i32,
    pub school_id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct FacultyMemberDto {
    pub user: UserDto,
    pub title: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AddFacultyMemberDto {
    pub user_id: i32,
    pub title: Option<String>,
}
