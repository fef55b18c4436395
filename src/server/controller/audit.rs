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
        audit::{AuditEntryDto, AuditFilterParams},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::audit::RestorableEntity,
        service::audit::AuditService,
        state::AppState,
        util::parse::parse_input,
    },
};

pub static AUDIT_TAG: &str = "audit";

#[utoipa::path(
    get,
    path = "/api/admin/audit",
    tag = AUDIT_TAG,
    params(AuditFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Audit entries, newest first", body = PaginatedDto<AuditEntryDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a platform admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_audit_log(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<AuditFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let entries = AuditService::new(&state.db)
        .list(&admin, filter.entity_type.as_deref(), pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(entries.into_dto(|entry| entry.into_dto()))))
}

#[utoipa::path(
    post,
    path = "/api/admin/restore/{entity_type}/{entity_id}",
    tag = AUDIT_TAG,
    params(
        ("entity_type" = String, Path, description = "post or course"),
        ("entity_id" = i32, Path, description = "ID of the deleted row"),
    ),
    responses(
        (status = 204, description = "Row restored"),
        (status = 400, description = "Entity type cannot be restored", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a platform admin", body = ErrorDto),
        (status = 404, description = "No deleted row with that id", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn restore(
    State(state): State<AppState>,
    session: Session,
    Path((entity_type, entity_id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let entity = parse_input::<RestorableEntity>("entity_type", &entity_type)?;
    AuditService::new(&state.db)
        .restore(&admin, entity, entity_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
