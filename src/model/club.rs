use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ClubDto {
    pub id: i32,
    pub organization_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i32,
    pub member_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateClubDto {
    pub organization_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct ClubFilterParams {
    pub organization_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ClubMemberDto {
    pub user: UserDto,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct EventDto {
    pub id: i32,
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub attendee_count: u64,
    pub attending: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateEventDto {
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct EventFilterParams {
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
}
