use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct JobDto {
    pub id: i32,
    pub organization_id: Option<i32>,
    pub posted_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: String,
    pub status: String,
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or updating a job posting.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct JobFormDto {
    pub organization_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    /// `full_time`, `part_time`, `contract`, `internship` or `temporary`.
    pub employment_type: String,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct JobFilterParams {
    pub organization_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ApplicationDto {
    pub id: i32,
    pub job_id: i32,
    pub applicant: UserDto,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ApplyDto {
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ApplicationStatusDto {
    /// `reviewing`, `accepted` or `rejected`.
    pub status: String,
}
