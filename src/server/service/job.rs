//! Job postings and the applications made to them.
//!
//! Application lifecycle:
//!
//! ```text
//! SUBMITTED ──▶ REVIEWING ──▶ ACCEPTED | REJECTED
//!     └────────────┴──withdraw──▶ WITHDRAWN
//! ```

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository,
        job::{ApplicationRepository, JobRepository},
        notification::NotificationRepository,
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        job::{ApplicationStatus, ApplyParam, Job, JobApplication, JobParam, JobStatus},
        notification::{CreateNotificationParam, NotificationKind},
        organization::OrgRole,
        user::User,
        PageRequest, Paginated,
    },
    service::organization::{find_organization, org_role, require_org_role},
    util::parse::StoredEnum,
};

pub struct JobService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> JobService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a job. Jobs tied to an organization need an owner or admin of it.
    pub async fn create(&self, actor: &User, param: JobParam) -> Result<Job, AppError> {
        if let Some(organization_id) = param.organization_id {
            find_organization(self.db, organization_id).await?;
            require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;
        }

        let param = validate_job(param)?;

        Ok(JobRepository::new(self.db).create(actor.id, param).await?)
    }

    /// Open jobs, optionally limited to one organization.
    pub async fn list_open(
        &self,
        organization_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Paginated<Job>, AppError> {
        Ok(JobRepository::new(self.db)
            .list_open(organization_id, page)
            .await?)
    }

    pub async fn get(&self, job_id: i32) -> Result<Job, AppError> {
        JobRepository::new(self.db)
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    /// Edits a posting. The organization a job belongs to cannot change.
    pub async fn update(&self, actor: &User, job_id: i32, param: JobParam) -> Result<Job, AppError> {
        let job = self.get(job_id).await?;
        self.ensure_can_manage(actor, &job).await?;

        let param = validate_job(JobParam {
            organization_id: job.organization_id,
            ..param
        })?;

        Ok(JobRepository::new(self.db).update(job.id, param).await?)
    }

    /// Stops accepting applications.
    pub async fn close(&self, actor: &User, job_id: i32) -> Result<Job, AppError> {
        let job = self.get(job_id).await?;
        self.ensure_can_manage(actor, &job).await?;

        if job.status == JobStatus::Closed {
            return Err(AppError::Conflict("Job is already closed".to_string()));
        }

        JobRepository::new(self.db)
            .set_status(job.id, JobStatus::Closed)
            .await?;

        self.get(job.id).await
    }

    pub async fn delete(&self, actor: &User, job_id: i32) -> Result<(), AppError> {
        let job = self.get(job_id).await?;
        self.ensure_can_manage(actor, &job).await?;

        let txn = self.db.begin().await?;
        JobRepository::new(&txn).soft_delete(job.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "job.deleted", entity_type::JOB, job.id)
                    .details(serde_json::json!({ "title": job.title })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Applies to a job.
    ///
    /// # Returns
    /// - `Ok(JobApplication)` - The submitted application
    /// - `Err(AppError::Conflict)` - Job closed or past its closing date, or an active
    ///   application already exists
    /// - `Err(AppError::BadRequest)` - The poster applied to their own job
    pub async fn apply(
        &self,
        actor: &User,
        job_id: i32,
        param: ApplyParam,
    ) -> Result<JobApplication, AppError> {
        let job = self.get(job_id).await?;

        if !job.accepts_applications(Utc::now()) {
            return Err(AppError::Conflict(
                "This job is no longer accepting applications".to_string(),
            ));
        }
        if job.posted_by == actor.id {
            return Err(AppError::BadRequest(
                "You cannot apply to your own job".to_string(),
            ));
        }

        let param = validate_application(param)?;

        let application_repo = ApplicationRepository::new(self.db);
        if application_repo
            .find_active(job.id, actor.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You already have an active application for this job".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let application = ApplicationRepository::new(&txn)
            .create(job.id, actor.id, param)
            .await?;
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    job.posted_by,
                    actor.id,
                    NotificationKind::ApplicationReceived,
                    format!("{} applied to {}", actor.name, job.title),
                )
                .link(format!("/jobs/{}/applications", job.id)),
            )
            .await?;
        txn.commit().await?;

        Ok(application)
    }

    /// Withdraws the actor's own application while it is still undecided.
    pub async fn withdraw(
        &self,
        actor: &User,
        application_id: i32,
    ) -> Result<JobApplication, AppError> {
        let application = self.find_application(application_id).await?;

        if application.applicant_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the applicant can withdraw this application".to_string(),
            ));
        }
        if !application.status.is_active() {
            return Err(illegal_transition(application.status, ApplicationStatus::Withdrawn));
        }

        self.transition(&application, ApplicationStatus::Withdrawn)
            .await?;

        self.find_application(application.id).await
    }

    /// Applications to a job with their applicants. Poster or org owner/admin.
    pub async fn applications_for_job(
        &self,
        actor: &User,
        job_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<(JobApplication, User)>, AppError> {
        let job = self.get(job_id).await?;
        self.ensure_can_manage(actor, &job).await?;

        Ok(ApplicationRepository::new(self.db)
            .list_for_job(job.id, page)
            .await?)
    }

    /// Moves an application along the review path and tells the applicant.
    ///
    /// # Returns
    /// - `Ok(JobApplication)` - The application in its new status
    /// - `Err(AppError::Forbidden)` - Actor is neither the poster nor an org owner/admin
    /// - `Err(AppError::Conflict)` - The transition is not allowed from the current status
    pub async fn update_status(
        &self,
        actor: &User,
        application_id: i32,
        next: ApplicationStatus,
    ) -> Result<JobApplication, AppError> {
        let application = self.find_application(application_id).await?;
        let job = self.get(application.job_id).await?;
        self.ensure_can_manage(actor, &job).await?;

        if !application.status.can_review_to(next) {
            return Err(illegal_transition(application.status, next));
        }

        let txn = self.db.begin().await?;
        if !ApplicationRepository::new(&txn)
            .transition(application.id, application.status, next)
            .await?
        {
            return Err(illegal_transition(application.status, next));
        }
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    application.applicant_id,
                    actor.id,
                    NotificationKind::ApplicationStatusChanged,
                    format!("Your application to {} is now {}", job.title, next.as_str()),
                )
                .link(format!("/jobs/{}", job.id)),
            )
            .await?;
        txn.commit().await?;

        self.find_application(application.id).await
    }

    pub async fn my_applications(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<JobApplication>, AppError> {
        Ok(ApplicationRepository::new(self.db)
            .list_for_applicant(actor.id, page)
            .await?)
    }

    async fn find_application(&self, application_id: i32) -> Result<JobApplication, AppError> {
        ApplicationRepository::new(self.db)
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    async fn transition(
        &self,
        application: &JobApplication,
        next: ApplicationStatus,
    ) -> Result<(), AppError> {
        let updated = ApplicationRepository::new(self.db)
            .transition(application.id, application.status, next)
            .await?;

        if !updated {
            return Err(illegal_transition(application.status, next));
        }

        Ok(())
    }

    /// Poster, or owner/admin of the job's organization.
    async fn ensure_can_manage(&self, actor: &User, job: &Job) -> Result<(), AppError> {
        if job.posted_by == actor.id {
            return Ok(());
        }

        let is_manager = match job.organization_id {
            Some(organization_id) => org_role(self.db, organization_id, actor.id)
                .await?
                .is_some_and(OrgRole::is_manager),
            None => false,
        };

        if !is_manager {
            return Err(AppError::Forbidden(
                "Only the poster can manage this job".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_job(param: JobParam) -> Result<JobParam, ValidationError> {
    let param = JobParam {
        title: param.title.trim().to_string(),
        description: param.description.trim().to_string(),
        location: param
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
        ..param
    };

    let mut errors = ValidationError::new();
    errors.check_length("title", &param.title, 1, 200);
    errors.check_length("description", &param.description, 1, 10_000);
    errors.check_max_length("location", param.location.as_deref(), 200);
    if let Some(closes_at) = param.closes_at {
        errors.check("closes_at", closes_at > Utc::now(), "must be in the future");
    }
    errors.finish()?;

    Ok(param)
}

fn validate_application(param: ApplyParam) -> Result<ApplyParam, ValidationError> {
    let param = ApplyParam {
        cover_letter: param
            .cover_letter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        resume_url: param
            .resume_url
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    };

    let mut errors = ValidationError::new();
    errors.check_max_length("cover_letter", param.cover_letter.as_deref(), 5000);
    if let Some(resume_url) = &param.resume_url {
        errors.check_max_length("resume_url", Some(resume_url), 2048);
        errors.check(
            "resume_url",
            url::Url::parse(resume_url).is_ok(),
            "must be an absolute URL",
        );
    }
    errors.finish()?;

    Ok(param)
}

fn illegal_transition(from: ApplicationStatus, to: ApplicationStatus) -> AppError {
    AppError::Conflict(format!(
        "Application cannot move from {} to {}",
        from.as_str(),
        to.as_str()
    ))
}
