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
        follow::{FollowRequestDto, FollowResultDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::follow::FollowService,
        state::AppState,
    },
};

pub static FOLLOW_TAG: &str = "follow";

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/follow",
    tag = FOLLOW_TAG,
    params(("user_id" = i32, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Followed, or a follow request was sent to a private account", body = FollowResultDto),
        (status = 400, description = "Tried to follow yourself", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "Already following or a request is pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn follow_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let outcome = FollowService::new(&state.db).follow(&actor, user_id).await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/follow",
    tag = FOLLOW_TAG,
    params(("user_id" = i32, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Not following this user", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unfollow_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    FollowService::new(&state.db).unfollow(&actor, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/users/me/followers/{user_id}",
    tag = FOLLOW_TAG,
    params(("user_id" = i32, Path, description = "Follower to remove")),
    responses(
        (status = 204, description = "Follower removed"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "User does not follow you", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_follower(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    FollowService::new(&state.db)
        .remove_follower(&actor, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/follow-requests/incoming",
    tag = FOLLOW_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Pending requests to follow the caller", body = PaginatedDto<FollowRequestDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_incoming_requests(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let requests = FollowService::new(&state.db)
        .incoming_requests(&actor, pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(requests.into_dto(|(request, requester)| request.into_dto(requester))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/follow-requests/outgoing",
    tag = FOLLOW_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Pending requests sent by the caller", body = PaginatedDto<FollowRequestDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_outgoing_requests(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let requests = FollowService::new(&state.db)
        .outgoing_requests(&actor, pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(requests.into_dto(|(request, target)| request.into_dto(target))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/follow-requests/{request_id}/accept",
    tag = FOLLOW_TAG,
    params(("request_id" = i32, Path, description = "Follow request ID")),
    responses(
        (status = 204, description = "Request accepted, the requester now follows you"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Request is addressed to someone else", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 409, description = "Request is no longer pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    FollowService::new(&state.db)
        .accept(&actor, request_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/follow-requests/{request_id}/reject",
    tag = FOLLOW_TAG,
    params(("request_id" = i32, Path, description = "Follow request ID")),
    responses(
        (status = 204, description = "Request rejected"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Request is addressed to someone else", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 409, description = "Request is no longer pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    FollowService::new(&state.db)
        .reject(&actor, request_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/follow-requests/{request_id}",
    tag = FOLLOW_TAG,
    params(("request_id" = i32, Path, description = "Follow request ID")),
    responses(
        (status = 204, description = "Request cancelled"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Request was sent by someone else", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 409, description = "Request is no longer pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    FollowService::new(&state.db)
        .cancel(&actor, request_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
