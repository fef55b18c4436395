use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{CountDto, ErrorDto, PaginatedDto, PaginationParams},
        notification::{NotificationDto, NotificationFilterParams},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard,
        service::notification::NotificationService, state::AppState,
    },
};

pub static NOTIFICATION_TAG: &str = "notification";

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = NOTIFICATION_TAG,
    params(NotificationFilterParams, PaginationParams),
    responses(
        (status = 200, description = "The caller's notifications, newest first", body = PaginatedDto<NotificationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<NotificationFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let notifications = NotificationService::new(&state.db)
        .list(&actor, filter.unread_only, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(notifications.into_dto(|n| n.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Number of unread notifications", body = CountDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = NotificationService::new(&state.db)
        .unread_count(&actor)
        .await?;

    Ok((StatusCode::OK, Json(CountDto { count })))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{notification_id}/read",
    tag = NOTIFICATION_TAG,
    params(("notification_id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(notification_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let notification = NotificationService::new(&state.db)
        .mark_read(&actor, notification_id)
        .await?;

    Ok((StatusCode::OK, Json(notification.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Number of notifications marked read", body = CountDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = NotificationService::new(&state.db)
        .mark_all_read(&actor)
        .await?;

    Ok((StatusCode::OK, Json(CountDto { count })))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{notification_id}",
    tag = NOTIFICATION_TAG,
    params(("notification_id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    session: Session,
    Path(notification_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    NotificationService::new(&state.db)
        .delete(&actor, notification_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
