//! Courses, their approval workflow and enrollments.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::course::{CourseApprovalDto, CourseDto, EnrollmentDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

/// Lifecycle of a course.
///
/// ```text
/// DRAFT ──submit──▶ UNDER_REVIEW ──approve─────────▶ PUBLISHED
///                      ▲   │ ────reject──────────▶ REJECTED
///                      │   └─────request_changes─▶ NEEDS_REVISION
///                      └──────────submit─────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Draft,
    UnderReview,
    Published,
    Rejected,
    NeedsRevision,
}

impl StoredEnum for CourseStatus {
    const KIND: &'static str = "course status";
    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::UnderReview,
        Self::Published,
        Self::Rejected,
        Self::NeedsRevision,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::NeedsRevision => "needs_revision",
        }
    }
}

impl CourseStatus {
    /// States a course can be submitted for review from.
    pub const SUBMITTABLE: &'static [Self] = &[Self::Draft, Self::NeedsRevision];

    /// Course content can only change while the author holds it.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::NeedsRevision)
    }

    pub fn can_submit(self) -> bool {
        Self::SUBMITTABLE.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    ChangesRequested,
}

impl StoredEnum for ApprovalStatus {
    const KIND: &'static str = "approval status";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::ChangesRequested,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ChangesRequested => "changes_requested",
        }
    }
}

/// A reviewer's verdict on a pending approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
    RequestChanges,
}

impl StoredEnum for ReviewDecision {
    const KIND: &'static str = "review decision";
    const ALL: &'static [Self] = &[Self::Approve, Self::Reject, Self::RequestChanges];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestChanges => "request_changes",
        }
    }
}

impl ReviewDecision {
    pub fn approval_status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
            Self::RequestChanges => ApprovalStatus::ChangesRequested,
        }
    }

    pub fn course_status(self) -> CourseStatus {
        match self {
            Self::Approve => CourseStatus::Published,
            Self::Reject => CourseStatus::Rejected,
            Self::RequestChanges => CourseStatus::NeedsRevision,
        }
    }

    pub fn requires_feedback(self) -> bool {
        matches!(self, Self::RequestChanges)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i32,
    pub organization_id: i32,
    pub faculty_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn from_entity(entity: entity::course::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            organization_id: entity.organization_id,
            faculty_id: entity.faculty_id,
            created_by: entity.created_by,
            title: entity.title,
            code: entity.code,
            description: entity.description,
            credits: entity.credits,
            status: parse_stored(&entity.status)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    pub fn into_dto(self) -> CourseDto {
        CourseDto {
            id: self.id,
            organization_id: self.organization_id,
            faculty_id: self.faculty_id,
            created_by: self.created_by,
            title: self.title,
            code: self.code,
            description: self.description,
            credits: self.credits,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseApproval {
    pub id: i32,
    pub course_id: i32,
    pub submitted_by: i32,
    pub reviewer_id: Option<i32>,
    pub status: ApprovalStatus,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl CourseApproval {
    pub fn from_entity(entity: entity::course_approval::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            course_id: entity.course_id,
            submitted_by: entity.submitted_by,
            reviewer_id: entity.reviewer_id,
            status: parse_stored(&entity.status)?,
            feedback: entity.feedback,
            created_at: entity.created_at,
            reviewed_at: entity.reviewed_at,
        })
    }

    pub fn into_dto(self) -> CourseApprovalDto {
        CourseApprovalDto {
            id: self.id,
            course_id: self.course_id,
            submitted_by: self.submitted_by,
            reviewer_id: self.reviewer_id,
            status: self.status.as_str().to_string(),
            feedback: self.feedback,
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
        }
    }
}

/// Enrollment joined with the enrolled user.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub course_id: i32,
    pub user: User,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn into_dto(self) -> EnrollmentDto {
        EnrollmentDto {
            course_id: self.course_id,
            user: self.user.into_dto(),
            enrolled_at: self.enrolled_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCourseParam {
    pub organization_id: i32,
    pub faculty_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct UpdateCourseParam {
    pub faculty_id: Option<i32>,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
}
