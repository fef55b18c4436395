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
        course::{CourseApprovalDto, CourseDto, CourseFormDto, EnrollmentDto, ReviewCourseDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::course::ReviewDecision,
        service::course::{CourseForm, CourseService},
        state::AppState,
        util::parse::parse_input,
    },
};

pub static COURSE_TAG: &str = "course";

impl From<CourseFormDto> for CourseForm {
    fn from(dto: CourseFormDto) -> Self {
        Self {
            faculty_id: dto.faculty_id,
            title: dto.title,
            code: dto.code,
            description: dto.description,
            credits: dto.credits,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/organizations/{organization_id}/courses",
    tag = COURSE_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    request_body = CourseFormDto,
    responses(
        (status = 201, description = "Draft course created", body = CourseDto),
        (status = 400, description = "Invalid course data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an instructor, admin or owner", body = ErrorDto),
        (status = 404, description = "Organization or faculty not found", body = ErrorDto),
        (status = 409, description = "Course code already used in the organization", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_course(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Json(payload): Json<CourseFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let course = CourseService::new(&state.db)
        .create(&actor, organization_id, CourseForm::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(course.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/organizations/{organization_id}/courses",
    tag = COURSE_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID"), PaginationParams),
    responses(
        (status = 200, description = "Published courses, plus drafts the caller may see", body = PaginatedDto<CourseDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_organization_courses(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let courses = CourseService::new(&state.db)
        .list_for_organization(&viewer, organization_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(courses.into_dto(|course| course.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "The course", body = CourseDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Course not found or not visible", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_course(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let course = CourseService::new(&state.db).get(&viewer, course_id).await?;

    Ok((StatusCode::OK, Json(course.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    request_body = CourseFormDto,
    responses(
        (status = 200, description = "Updated course", body = CourseDto),
        (status = 400, description = "Invalid course data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not edit this course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 409, description = "Course is locked in its current status", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_course(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
    Json(payload): Json<CourseFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let course = CourseService::new(&state.db)
        .update(&actor, course_id, CourseForm::from(payload))
        .await?;

    Ok((StatusCode::OK, Json(course.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not delete this course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_course(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    CourseService::new(&state.db)
        .delete(&actor, course_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/submit",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Submitted for review, a reviewer was assigned", body = CourseApprovalDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not submit this course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 409, description = "Course cannot be submitted or no reviewer is available", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_course(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let approval = CourseService::new(&state.db)
        .submit(&actor, course_id)
        .await?;

    Ok((StatusCode::CREATED, Json(approval.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/approvals",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Review rounds, newest first", body = Vec<CourseApprovalDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not see the review history", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_approval_history(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let approvals = CourseService::new(&state.db)
        .approval_history(&actor, course_id)
        .await?;

    let dto: Vec<CourseApprovalDto> = approvals.into_iter().map(|a| a.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/course-approvals",
    tag = COURSE_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Pending reviews assigned to the caller", body = PaginatedDto<CourseApprovalDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_review_queue(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let approvals = CourseService::new(&state.db)
        .review_queue(&actor, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(approvals.into_dto(|a| a.into_dto()))))
}

#[utoipa::path(
    post,
    path = "/api/course-approvals/{approval_id}/review",
    tag = COURSE_TAG,
    params(("approval_id" = i32, Path, description = "Approval ID")),
    request_body = ReviewCourseDto,
    responses(
        (status = 200, description = "Decision recorded and the course moved on", body = CourseApprovalDto),
        (status = 400, description = "Unknown decision or missing feedback", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the assigned reviewer", body = ErrorDto),
        (status = 404, description = "Approval not found", body = ErrorDto),
        (status = 409, description = "Approval was already decided", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn review_course(
    State(state): State<AppState>,
    session: Session,
    Path(approval_id): Path<i32>,
    Json(payload): Json<ReviewCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let decision = parse_input::<ReviewDecision>("decision", &payload.decision)?;
    let approval = CourseService::new(&state.db)
        .review(&actor, approval_id, decision, payload.feedback)
        .await?;

    Ok((StatusCode::OK, Json(approval.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/enrollment",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Enrolled"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a member of the organization", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 409, description = "Course not published or already enrolled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn enroll(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    CourseService::new(&state.db)
        .enroll(&actor, course_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}/enrollment",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Unenrolled"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Not enrolled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unenroll(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    CourseService::new(&state.db)
        .unenroll(&actor, course_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/enrollments",
    tag = COURSE_TAG,
    params(("course_id" = i32, Path, description = "Course ID"), PaginationParams),
    responses(
        (status = 200, description = "Enrolled students", body = PaginatedDto<EnrollmentDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not see the roster", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_enrollments(
    State(state): State<AppState>,
    session: Session,
    Path(course_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let enrollments = CourseService::new(&state.db)
        .enrollments(&actor, course_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(enrollments.into_dto(|e| e.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/courses/enrolled",
    tag = COURSE_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Courses the caller is enrolled in", body = PaginatedDto<CourseDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_my_enrollments(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let courses = CourseService::new(&state.db)
        .my_enrollments(&actor, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(courses.into_dto(|course| course.into_dto()))))
}
