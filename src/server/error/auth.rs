use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user id is stored in the session; the caller is not logged in.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("User not found in session")]
    UserNotInSession,

    /// The session references a user that no longer exists or was deleted.
    ///
    /// Results in a 401 Unauthorized response so the client logs in again.
    #[error("User {0} stored in session was not found in the database")]
    UserNotInDatabase(i32),

    /// The user lacks a platform-level permission.
    ///
    /// The message is only logged. Results in a 403 Forbidden response.
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// CSRF state validation failed during OAuth callback.
    ///
    /// The CSRF state token in the OAuth callback URL does not match the token stored
    /// in the session, indicating a potential CSRF attack or an invalid callback request.
    /// Results in a 400 Bad Request response.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// Exchanging the authorization code with the identity provider failed.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(String),

    /// The identity provider's user info response was unusable.
    #[error("Failed to fetch user info from identity provider: {0}")]
    UserInfo(String),

    /// The bearer token sent to a cron endpoint does not match `CRON_SECRET`.
    #[error("Invalid cron secret")]
    InvalidCronSecret,
}

/// Converts authentication errors into HTTP responses.
///
/// - `UserNotInSession` / `UserNotInDatabase` / `InvalidCronSecret` → 401 Unauthorized
/// - `AccessDenied` → 403 Forbidden
/// - `CsrfValidationFailed` → 400 Bad Request
/// - `TokenExchange` / `UserInfo` → 500 Internal Server Error
///
/// All errors are logged at debug level for diagnostics while keeping client-facing
/// messages generic.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto::new("You must be logged in")),
            )
                .into_response(),
            Self::InvalidCronSecret => {
                (StatusCode::UNAUTHORIZED, Json(ErrorDto::new("Unauthorized"))).into_response()
            }
            Self::AccessDenied(_, _) => (
                StatusCode::FORBIDDEN,
                Json(ErrorDto::new("Insufficient permissions")),
            )
                .into_response(),
            Self::CsrfValidationFailed => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto::new(
                    "There was an issue logging you in, please try again.",
                )),
            )
                .into_response(),
            err @ (Self::TokenExchange(_) | Self::UserInfo(_)) => {
                tracing::error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
