//! Job postings and applications.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::job::{ApplicationDto, JobDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Open,
    Closed,
}

impl StoredEnum for JobStatus {
    const KIND: &'static str = "job status";
    const ALL: &'static [Self] = &[Self::Open, Self::Closed];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl StoredEnum for EmploymentType {
    const KIND: &'static str = "employment type";
    const ALL: &'static [Self] = &[
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
        Self::Temporary,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Temporary => "temporary",
        }
    }
}

/// Lifecycle of a job application.
///
/// ```text
/// SUBMITTED ──▶ REVIEWING ──▶ ACCEPTED | REJECTED
///     └──────────┴──withdraw──▶ WITHDRAWN
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Submitted,
    Reviewing,
    Accepted,
    Rejected,
    Withdrawn,
}

impl StoredEnum for ApplicationStatus {
    const KIND: &'static str = "application status";
    const ALL: &'static [Self] = &[
        Self::Submitted,
        Self::Reviewing,
        Self::Accepted,
        Self::Rejected,
        Self::Withdrawn,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewing => "reviewing",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl ApplicationStatus {
    /// Active applications block a second application to the same job.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Submitted | Self::Reviewing)
    }

    /// Transitions the poster may apply. Withdrawal is the applicant's own move.
    pub fn can_review_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Reviewing)
                | (Self::Reviewing, Self::Accepted)
                | (Self::Reviewing, Self::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: i32,
    pub organization_id: Option<i32>,
    pub posted_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub status: JobStatus,
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn from_entity(entity: entity::job::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            organization_id: entity.organization_id,
            posted_by: entity.posted_by,
            title: entity.title,
            description: entity.description,
            location: entity.location,
            employment_type: parse_stored(&entity.employment_type)?,
            status: parse_stored(&entity.status)?,
            closes_at: entity.closes_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Open and not past its closing date.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Open && self.closes_at.map_or(true, |closes_at| closes_at > now)
    }

    pub fn into_dto(self) -> JobDto {
        JobDto {
            id: self.id,
            organization_id: self.organization_id,
            posted_by: self.posted_by,
            title: self.title,
            description: self.description,
            location: self.location,
            employment_type: self.employment_type.as_str().to_string(),
            status: self.status.as_str().to_string(),
            closes_at: self.closes_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    pub id: i32,
    pub job_id: i32,
    pub applicant_id: i32,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    pub fn from_entity(entity: entity::job_application::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            job_id: entity.job_id,
            applicant_id: entity.applicant_id,
            cover_letter: entity.cover_letter,
            resume_url: entity.resume_url,
            status: parse_stored(&entity.status)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    pub fn into_dto(self, applicant: User) -> ApplicationDto {
        ApplicationDto {
            id: self.id,
            job_id: self.job_id,
            applicant: applicant.into_dto(),
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobParam {
    pub organization_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ApplyParam {
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

impl From<crate::model::job::ApplyDto> for ApplyParam {
    fn from(dto: crate::model::job::ApplyDto) -> Self {
        Self {
            cover_letter: dto.cover_letter,
            resume_url: dto.resume_url,
        }
    }
}
