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
        research::{
            CollaborationRequestDto, CollaborationResponseDto, CollaboratorDto,
            ResearchDetailsDto, ResearchDto, ResearchFilterParams, ResearchFormDto,
        },
    },
    server::{
        error::{validation::ValidationError, AppError},
        middleware::auth::AuthGuard,
        model::research::{ResearchParam, ResearchStatus},
        service::research::ResearchService,
        state::AppState,
        util::parse::parse_input,
    },
};

pub static RESEARCH_TAG: &str = "research";

/// Builds the params from a form, using `current` when the form leaves the status out.
fn research_param(
    dto: ResearchFormDto,
    current: ResearchStatus,
) -> Result<ResearchParam, ValidationError> {
    let status = match dto.status.as_deref() {
        Some(status) => parse_input::<ResearchStatus>("status", status)?,
        None => current,
    };

    Ok(ResearchParam {
        organization_id: dto.organization_id,
        title: dto.title,
        summary: dto.summary,
        field: dto.field,
        status,
    })
}

#[utoipa::path(
    post,
    path = "/api/research",
    tag = RESEARCH_TAG,
    request_body = ResearchFormDto,
    responses(
        (status = 201, description = "Project created, recruiting unless a status was given", body = ResearchDto),
        (status = 400, description = "Invalid project data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a member of the organization", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_research(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ResearchFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let research = ResearchService::new(&state.db)
        .create(&actor, research_param(payload, ResearchStatus::Recruiting)?)
        .await?;

    Ok((StatusCode::CREATED, Json(research.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/research",
    tag = RESEARCH_TAG,
    params(ResearchFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Projects, newest first", body = PaginatedDto<ResearchDto>),
        (status = 400, description = "Unknown status filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_research_list(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ResearchFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let status = filter
        .status
        .as_deref()
        .map(|s| parse_input::<ResearchStatus>("status", s))
        .transpose()?;

    let projects = ResearchService::new(&state.db)
        .list(status, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(projects.into_dto(|r| r.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/research/{research_id}",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    responses(
        (status = 200, description = "Project with owner and collaborators", body = ResearchDetailsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_research(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let details = ResearchService::new(&state.db).get(research_id).await?;

    Ok((StatusCode::OK, Json(details.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/research/{research_id}",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    request_body = ResearchFormDto,
    responses(
        (status = 200, description = "Updated project", body = ResearchDto),
        (status = 400, description = "Invalid project data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the owner", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_research(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
    Json(payload): Json<ResearchFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let research_service = ResearchService::new(&state.db);
    let current = research_service.get(research_id).await?.research.status;

    let research = research_service
        .update(&actor, research_id, research_param(payload, current)?)
        .await?;

    Ok((StatusCode::OK, Json(research.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/research/{research_id}",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    responses(
        (status = 204, description = "Project soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the owner", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_research(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ResearchService::new(&state.db)
        .delete(&actor, research_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/research/{research_id}/collaborators",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    request_body = CollaborationRequestDto,
    responses(
        (status = 204, description = "Request sent to the owner"),
        (status = 400, description = "Own project or message too long", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 409, description = "Not recruiting or already requested", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn request_collaboration(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
    Json(payload): Json<CollaborationRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ResearchService::new(&state.db)
        .request_collaboration(&actor, research_id, payload.message)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/research/{research_id}/collaborators",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    responses(
        (status = 200, description = "Collaborators; the owner also sees open and rejected requests", body = Vec<CollaboratorDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_collaborators(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let collaborators = ResearchService::new(&state.db)
        .collaborators(&viewer, research_id)
        .await?;

    let dto: Vec<CollaboratorDto> = collaborators.into_iter().map(|c| c.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    put,
    path = "/api/research/{research_id}/collaborators/{user_id}",
    tag = RESEARCH_TAG,
    params(
        ("research_id" = i32, Path, description = "Research project ID"),
        ("user_id" = i32, Path, description = "Requesting user's ID"),
    ),
    request_body = CollaborationResponseDto,
    responses(
        (status = 204, description = "Request answered, the requester was notified"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the owner", body = ErrorDto),
        (status = 404, description = "Project or request not found", body = ErrorDto),
        (status = 409, description = "Request was already answered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn respond_to_collaboration(
    State(state): State<AppState>,
    session: Session,
    Path((research_id, user_id)): Path<(i32, i32)>,
    Json(payload): Json<CollaborationResponseDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ResearchService::new(&state.db)
        .respond(&actor, research_id, user_id, payload.accept)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/research/{research_id}/collaborators/me",
    tag = RESEARCH_TAG,
    params(("research_id" = i32, Path, description = "Research project ID")),
    responses(
        (status = 204, description = "Left the project or withdrew the request"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Not a collaborator", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_research(
    State(state): State<AppState>,
    session: Session,
    Path(research_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ResearchService::new(&state.db)
        .leave(&actor, research_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
