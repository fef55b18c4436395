use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto, PaginationParams},
        user::{CurrentUserDto, ProfileDto, UpdateProfileDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::UpdateProfileParam,
        service::{follow::FollowService, user::UserService},
        state::AppState,
    },
};

pub static USER_TAG: &str = "user";

#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Fragment of a name or username.
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = USER_TAG,
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile with counts and the caller's relationship", body = ProfileDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let profile = UserService::new(&state.db)
        .get_profile(viewer.id, user_id)
        .await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = USER_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = CurrentUserDto),
        (status = 400, description = "Invalid profile data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Username taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let user = UserService::new(&state.db)
        .update_profile(&actor, UpdateProfileParam::from(payload))
        .await?;

    Ok((StatusCode::OK, Json(user.into_current_dto())))
}

#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = USER_TAG,
    params(SearchParams, PaginationParams),
    responses(
        (status = 200, description = "Matching users", body = PaginatedDto<UserDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn search_users(
    State(state): State<AppState>,
    session: Session,
    Query(search): Query<SearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let users = UserService::new(&state.db)
        .search(&search.q, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto(|user| user.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/followers",
    tag = USER_TAG,
    params(("user_id" = i32, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "Followers of the user", body = PaginatedDto<UserDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_followers(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let followers = FollowService::new(&state.db)
        .followers(&viewer, user_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(followers.into_dto(|user| user.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/following",
    tag = USER_TAG,
    params(("user_id" = i32, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "Users the user follows", body = PaginatedDto<UserDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_following(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let following = FollowService::new(&state.db)
        .following(&viewer, user_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(following.into_dto(|user| user.into_dto()))))
}
