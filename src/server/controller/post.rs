use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{CursorPageDto, CursorParams, ErrorDto, PaginatedDto, PaginationParams},
        post::{CommentDto, CommentFormDto, PostDto, PostFormDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::post::PostService,
        state::AppState,
    },
};

pub static POST_TAG: &str = "post";

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = POST_TAG,
    request_body = PostFormDto,
    responses(
        (status = 201, description = "Post published", body = PostDto),
        (status = 400, description = "Empty or too long", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<PostFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = PostService::new(&state.db)
        .create(&actor, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(post.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/feed",
    tag = POST_TAG,
    params(CursorParams),
    responses(
        (status = 200, description = "Own posts and posts of followed users, newest first", body = CursorPageDto<PostDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_feed(
    State(state): State<AppState>,
    session: Session,
    Query(cursor): Query<CursorParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let feed = PostService::new(&state.db)
        .feed(&viewer, cursor.into())
        .await?;

    Ok((StatusCode::OK, Json(feed.into_dto(|post| post.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/posts",
    tag = POST_TAG,
    params(("user_id" = i32, Path, description = "Author's user ID"), CursorParams),
    responses(
        (status = 200, description = "Posts by the user, newest first", body = CursorPageDto<PostDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_posts(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Query(cursor): Query<CursorParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let posts = PostService::new(&state.db)
        .by_author(&viewer, user_id, cursor.into())
        .await?;

    Ok((StatusCode::OK, Json(posts.into_dto(|post| post.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = PostDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_post(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = PostService::new(&state.db).get(&viewer, post_id).await?;

    Ok((StatusCode::OK, Json(post.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{post_id}",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    request_body = PostFormDto,
    responses(
        (status = 200, description = "Edited post", body = PostDto),
        (status = 400, description = "Empty or too long", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the author", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_post(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
    Json(payload): Json<PostFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = PostService::new(&state.db)
        .update(&actor, post_id, payload.content)
        .await?;

    Ok((StatusCode::OK, Json(post.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not the author", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_post(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    PostService::new(&state.db).delete(&actor, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/like",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Liked"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 409, description = "Already liked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn like_post(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    PostService::new(&state.db).like(&actor, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/like",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Like removed"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Post not found or not liked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unlike_post(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    PostService::new(&state.db).unlike(&actor, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID")),
    request_body = CommentFormDto,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Empty or too long", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_comment(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
    Json(payload): Json<CommentFormDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let comment = PostService::new(&state.db)
        .add_comment(&actor, post_id, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments",
    tag = POST_TAG,
    params(("post_id" = i32, Path, description = "Post ID"), PaginationParams),
    responses(
        (status = 200, description = "Comments, oldest first", body = PaginatedDto<CommentDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Private account not followed by the caller", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_comments(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let comments = PostService::new(&state.db)
        .comments(&viewer, post_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(comments.into_dto(|c| c.into_dto()))))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    tag = POST_TAG,
    params(("comment_id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is neither the commenter nor the post author", body = ErrorDto),
        (status = 404, description = "Comment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    session: Session,
    Path(comment_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    PostService::new(&state.db)
        .delete_comment(&actor, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
