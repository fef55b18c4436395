//! Job postings and applications.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{active_user_ids, fetch_page, users_by_id},
    model::{
        job::{ApplicationStatus, ApplyParam, Job, JobApplication, JobParam, JobStatus},
        user::User,
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct JobRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> JobRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an open job posting.
    pub async fn create(&self, posted_by: i32, param: JobParam) -> Result<Job, DbErr> {
        let now = Utc::now();

        let entity = entity::job::ActiveModel {
            organization_id: ActiveValue::Set(param.organization_id),
            posted_by: ActiveValue::Set(posted_by),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            location: ActiveValue::Set(param.location),
            employment_type: ActiveValue::Set(param.employment_type.as_str().to_string()),
            status: ActiveValue::Set(JobStatus::Open.as_str().to_string()),
            closes_at: ActiveValue::Set(param.closes_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Job::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Job>, DbErr> {
        entity::prelude::Job::find_by_id(id)
            .filter(entity::job::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .map(Job::from_entity)
            .transpose()
    }

    /// Overwrites the posting's fields. The organization a job belongs to never changes.
    pub async fn update(&self, id: i32, param: JobParam) -> Result<Job, DbErr> {
        let entity = entity::prelude::Job::find_by_id(id)
            .filter(entity::job::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("job {}", id)))?;

        let mut active: entity::job::ActiveModel = entity.into();
        active.title = ActiveValue::Set(param.title);
        active.description = ActiveValue::Set(param.description);
        active.location = ActiveValue::Set(param.location);
        active.employment_type = ActiveValue::Set(param.employment_type.as_str().to_string());
        active.closes_at = ActiveValue::Set(param.closes_at);
        active.updated_at = ActiveValue::Set(Utc::now());

        Job::from_entity(active.update(self.db).await?)
    }

    pub async fn set_status(&self, id: i32, status: JobStatus) -> Result<bool, DbErr> {
        let result = entity::prelude::Job::update_many()
            .col_expr(entity::job::Column::Status, Expr::value(status.as_str()))
            .col_expr(entity::job::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::job::Column::Id.eq(id))
            .filter(entity::job::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Open postings, newest first, optionally limited to one organization.
    pub async fn list_open(
        &self,
        organization_id: Option<i32>,
        page: PageRequest,
    ) -> Result<Paginated<Job>, DbErr> {
        let mut select = entity::prelude::Job::find()
            .filter(entity::job::Column::Status.eq(JobStatus::Open.as_str()))
            .filter(entity::job::Column::DeletedAt.is_null());

        if let Some(organization_id) = organization_id {
            select = select.filter(entity::job::Column::OrganizationId.eq(organization_id));
        }

        let select = select
            .order_by_desc(entity::job::Column::CreatedAt)
            .order_by_desc(entity::job::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Job::from_entity)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Job::update_many()
            .col_expr(entity::job::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::job::Column::Id.eq(id))
            .filter(entity::job::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

pub struct ApplicationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ApplicationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a submitted application.
    pub async fn create(
        &self,
        job_id: i32,
        applicant_id: i32,
        param: ApplyParam,
    ) -> Result<JobApplication, DbErr> {
        let now = Utc::now();

        let entity = entity::job_application::ActiveModel {
            job_id: ActiveValue::Set(job_id),
            applicant_id: ActiveValue::Set(applicant_id),
            cover_letter: ActiveValue::Set(param.cover_letter),
            resume_url: ActiveValue::Set(param.resume_url),
            status: ActiveValue::Set(ApplicationStatus::Submitted.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        JobApplication::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<JobApplication>, DbErr> {
        entity::prelude::JobApplication::find_by_id(id)
            .one(self.db)
            .await?
            .map(JobApplication::from_entity)
            .transpose()
    }

    /// Finds the applicant's submitted or reviewing application for a job.
    pub async fn find_active(
        &self,
        job_id: i32,
        applicant_id: i32,
    ) -> Result<Option<JobApplication>, DbErr> {
        entity::prelude::JobApplication::find()
            .filter(entity::job_application::Column::JobId.eq(job_id))
            .filter(entity::job_application::Column::ApplicantId.eq(applicant_id))
            .filter(entity::job_application::Column::Status.is_in([
                ApplicationStatus::Submitted.as_str(),
                ApplicationStatus::Reviewing.as_str(),
            ]))
            .one(self.db)
            .await?
            .map(JobApplication::from_entity)
            .transpose()
    }

    /// Moves an application from `from` to `to`.
    ///
    /// # Returns
    /// - `Ok(true)` - The application was in `from` and now holds `to`
    /// - `Ok(false)` - It is missing or changed state in the meantime
    pub async fn transition(
        &self,
        id: i32,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::JobApplication::update_many()
            .col_expr(
                entity::job_application::Column::Status,
                Expr::value(to.as_str()),
            )
            .col_expr(
                entity::job_application::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::job_application::Column::Id.eq(id))
            .filter(entity::job_application::Column::Status.eq(from.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Applications to a job with their applicants, oldest first.
    pub async fn list_for_job(
        &self,
        job_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<(JobApplication, User)>, DbErr> {
        let select = entity::prelude::JobApplication::find()
            .filter(entity::job_application::Column::JobId.eq(job_id))
            .filter(entity::job_application::Column::ApplicantId.in_subquery(active_user_ids()))
            .order_by_asc(entity::job_application::Column::CreatedAt)
            .order_by_asc(entity::job_application::Column::Id);

        let rows = fetch_page(self.db, select, page)
            .await?
            .try_map(JobApplication::from_entity)?;
        let mut users =
            users_by_id(self.db, rows.items.iter().map(|row| row.applicant_id)).await?;

        let items = rows
            .items
            .iter()
            .filter_map(|application| {
                users
                    .remove(&application.applicant_id)
                    .map(|user| (application.clone(), user))
            })
            .collect();

        Ok(rows.with_items(items))
    }

    /// Applications sent by `applicant_id`, newest first.
    pub async fn list_for_applicant(
        &self,
        applicant_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<JobApplication>, DbErr> {
        let select = entity::prelude::JobApplication::find()
            .filter(entity::job_application::Column::ApplicantId.eq(applicant_id))
            .order_by_desc(entity::job_application::Column::CreatedAt)
            .order_by_desc(entity::job_application::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(JobApplication::from_entity)
    }
}
