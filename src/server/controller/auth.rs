use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, user::CurrentUserDto},
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession, OAuthFlowSession},
        },
        service::auth::AuthService,
        state::AppState,
    },
};

pub static AUTH_TAG: &str = "auth";

#[derive(Deserialize, IntoParams)]
pub struct LoginParams {
    /// One-time admin code printed to the server log while no admin exists.
    pub code: Option<String>,
}

/// Query parameters for the OAuth callback endpoint.
#[derive(Deserialize, IntoParams)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: String,
    /// Authorization code exchanged for an access token.
    pub code: String,
}

#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    params(LoginParams),
    responses(
        (status = 307, description = "Redirect to the identity provider"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LoginParams>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.config.oauth.userinfo_url,
    );

    if let Some(code) = params.code {
        if state.admin_code_service.validate_and_consume(&code).await {
            OAuthFlowSession::new(&session).set_admin_flag(true).await?;
        } else {
            tracing::warn!("Login attempted with an invalid or expired admin code");
        }
    }

    let (url, csrf_token) = auth_service.login_url();
    CsrfSession::new(&session)
        .set_token(csrf_token.secret().to_string())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = AUTH_TAG,
    params(CallbackParams),
    responses(
        (status = 307, description = "Logged in, redirect to the app"),
        (status = 400, description = "CSRF state mismatch", body = ErrorDto),
        (status = 500, description = "Token exchange or identity lookup failed", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    validate_csrf(&session, &params.state).await?;

    let set_admin = OAuthFlowSession::new(&session).take_admin_flag().await?;

    let user = AuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.config.oauth.userinfo_url,
    )
    .callback(params.code, set_admin)
    .await?;

    AuthSession::new(&session).set_user_id(user.id).await?;

    tracing::debug!("User {} logged in", user.id);

    Ok(Redirect::temporary(&state.config.app_url))
}

#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "The logged in user", body = CurrentUserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    Ok((StatusCode::OK, Json(user.into_current_dto())))
}

async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), AppError> {
    let stored_state = CsrfSession::new(session).take_token().await?;

    match stored_state {
        Some(state) if state == csrf_state => Ok(()),
        _ => Err(AuthError::CsrfValidationFailed.into()),
    }
}
