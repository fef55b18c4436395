use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto, PaginationParams},
        job::{ApplicationDto, ApplicationStatusDto, ApplyDto, JobDto, JobFilterParams, JobFormDto},
    },
    server::{
        error::{validation::ValidationError, AppError},
        middleware::auth::AuthGuard,
        model::job::{ApplicationStatus, ApplyParam, EmploymentType, JobParam},
        service::{job::JobService, user::UserService},
        state::AppState,
        util::parse::parse_input,
    },
};

pub static JOB_TAG: &str = "job";

impl TryFrom<JobFormDto> for JobParam {
    type Error = ValidationError;

    fn try_from(dto: JobFormDto) -> Result<Self, Self::Error> {
        Ok(Self {
            employment_type: parse_input::<EmploymentType>("employment_type", &dto.employment_type)?,
            organization_id: dto.organization_id,
            title: dto.title,
            description: dto.description,
            location: dto.location,
            closes_at: dto.closes_at,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = JOB_TAG,
    request_body = JobFormDto,
    responses(
        (status = 201, description = "Job posted", body = JobDto),
        (status = 400, description = "Invalid job data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin of the organization", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_job(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<JobFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let job = JobService::new(&state.db)
        .create(&actor, JobParam::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(job.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = JOB_TAG,
    params(JobFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Open jobs, newest first", body = PaginatedDto<JobDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_jobs(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<JobFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let jobs = JobService::new(&state.db)
        .list_open(filter.organization_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(jobs.into_dto(|job| job.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{job_id}",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "The job", body = JobDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let job = JobService::new(&state.db).get(job_id).await?;

    Ok((StatusCode::OK, Json(job.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{job_id}",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID")),
    request_body = JobFormDto,
    responses(
        (status = 200, description = "Updated job", body = JobDto),
        (status = 400, description = "Invalid job data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not manage this job", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(payload): Json<JobFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let job = JobService::new(&state.db)
        .update(&actor, job_id, JobParam::try_from(payload)?)
        .await?;

    Ok((StatusCode::OK, Json(job.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{job_id}/close",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job closed", body = JobDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not manage this job", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 409, description = "Job is already closed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn close_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let job = JobService::new(&state.db).close(&actor, job_id).await?;

    Ok((StatusCode::OK, Json(job.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{job_id}",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not manage this job", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    JobService::new(&state.db).delete(&actor, job_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/jobs/{job_id}/applications",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID")),
    request_body = ApplyDto,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationDto),
        (status = 400, description = "Invalid application or own job", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 409, description = "Job closed or an active application exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn apply(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Json(payload): Json<ApplyDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let application = JobService::new(&state.db)
        .apply(&actor, job_id, ApplyParam::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(application.into_dto(actor))))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{job_id}/applications",
    tag = JOB_TAG,
    params(("job_id" = i32, Path, description = "Job ID"), PaginationParams),
    responses(
        (status = 200, description = "Applications with their applicants", body = PaginatedDto<ApplicationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not manage this job", body = ErrorDto),
        (status = 404, description = "Job not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_job_applications(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let applications = JobService::new(&state.db)
        .applications_for_job(&actor, job_id, pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(applications.into_dto(|(application, applicant)| application.into_dto(applicant))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/job-applications/mine",
    tag = JOB_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "The caller's applications", body = PaginatedDto<ApplicationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_my_applications(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let applications = JobService::new(&state.db)
        .my_applications(&actor, pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(applications.into_dto(|application| application.into_dto(actor.clone()))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/job-applications/{application_id}/withdraw",
    tag = JOB_TAG,
    params(("application_id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application withdrawn", body = ApplicationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the applicant", body = ErrorDto),
        (status = 404, description = "Application not found", body = ErrorDto),
        (status = 409, description = "Application was already decided", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn withdraw_application(
    State(state): State<AppState>,
    session: Session,
    Path(application_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let application = JobService::new(&state.db)
        .withdraw(&actor, application_id)
        .await?;

    Ok((StatusCode::OK, Json(application.into_dto(actor))))
}

#[utoipa::path(
    put,
    path = "/api/job-applications/{application_id}/status",
    tag = JOB_TAG,
    params(("application_id" = i32, Path, description = "Application ID")),
    request_body = ApplicationStatusDto,
    responses(
        (status = 200, description = "Application moved to the new status", body = ApplicationDto),
        (status = 400, description = "Unknown status", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not manage this job", body = ErrorDto),
        (status = 404, description = "Application not found", body = ErrorDto),
        (status = 409, description = "Transition not allowed from the current status", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    session: Session,
    Path(application_id): Path<i32>,
    Json(payload): Json<ApplicationStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let status = parse_input::<ApplicationStatus>("status", &payload.status)?;
    let application = JobService::new(&state.db)
        .update_status(&actor, application_id, status)
        .await?;
    let applicant = UserService::new(&state.db)
        .get_user(application.applicant_id)
        .await?;

    Ok((StatusCode::OK, Json(application.into_dto(applicant))))
}
