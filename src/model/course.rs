use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseDto {
    pub id: i32,
    pub organization_id: i32,
    pub faculty_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or updating a course.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseFormDto {
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub faculty_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseApprovalDto {
    pub id: i32,
    pub course_id: i32,
    pub submitted_by: i32,
    pub reviewer_id: Option<i32>,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ReviewCourseDto {
    /// `approve`, `reject` or `request_changes`.
    pub decision: String,
    /// Required when requesting changes.
    pub feedback: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct EnrollmentDto {
    pub course_id: i32,
    pub user: UserDto,
    pub enrolled_at: DateTime<Utc>,
}
