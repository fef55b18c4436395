//! Factories for job postings and applications.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test job postings.
pub struct JobFactory<'a> {
    db: &'a DatabaseConnection,
    posted_by: i32,
    organization_id: Option<i32>,
    title: String,
    status: String,
    closes_at: Option<DateTime<Utc>>,
}

impl<'a> JobFactory<'a> {
    /// Defaults: open full-time job without organization or closing date.
    pub fn new(db: &'a DatabaseConnection, posted_by: i32) -> Self {
        Self {
            db,
            posted_by,
            organization_id: None,
            title: format!("Job {}", next_id()),
            status: "open".to_string(),
            closes_at: None,
        }
    }

    pub fn organization_id(mut self, organization_id: i32) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn closes_at(mut self, closes_at: DateTime<Utc>) -> Self {
        self.closes_at = Some(closes_at);
        self
    }

    pub async fn build(self) -> Result<entity::job::Model, DbErr> {
        let now = Utc::now();
        entity::job::ActiveModel {
            organization_id: ActiveValue::Set(self.organization_id),
            posted_by: ActiveValue::Set(self.posted_by),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set("Test job description".to_string()),
            location: ActiveValue::Set(None),
            employment_type: ActiveValue::Set("full_time".to_string()),
            status: ActiveValue::Set(self.status),
            closes_at: ActiveValue::Set(self.closes_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open job posted by `posted_by`.
pub async fn create_job(
    db: &DatabaseConnection,
    posted_by: i32,
) -> Result<entity::job::Model, DbErr> {
    JobFactory::new(db, posted_by).build().await
}

/// Creates an application with the given status.
pub async fn create_application(
    db: &DatabaseConnection,
    job_id: i32,
    applicant_id: i32,
    status: &str,
) -> Result<entity::job_application::Model, DbErr> {
    let now = Utc::now();
    entity::job_application::ActiveModel {
        job_id: ActiveValue::Set(job_id),
        applicant_id: ActiveValue::Set(applicant_id),
        cover_letter: ActiveValue::Set(None),
        resume_url: ActiveValue::Set(None),
        status: ActiveValue::Set(status.to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
