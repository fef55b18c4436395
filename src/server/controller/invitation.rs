use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto, PaginationParams},
        invitation::{
            CleanupResultDto, CreateInvitationDto, InvitationDetailsDto, InvitationDto,
            InvitationFilterParams,
        },
    },
    server::{
        error::{auth::AuthError, AppError},
        middleware::auth::AuthGuard,
        model::{invitation::InvitationStatus, organization::OrgRole},
        service::invitation::InvitationService,
        state::AppState,
        util::{parse::parse_input, token::secrets_match},
    },
};

pub static INVITATION_TAG: &str = "invitation";

/// Checks the `Authorization: Bearer <secret>` header of a cron call.
fn authorize_cron(headers: &HeaderMap, secret: &str) -> Result<(), AuthError> {
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(provided) if secrets_match(provided, secret) => Ok(()),
        _ => Err(AuthError::InvalidCronSecret),
    }
}

fn invitation_service(state: &AppState) -> InvitationService<'_> {
    InvitationService::new(
        &state.db,
        &state.mail_service,
        &state.config.app_url,
        state.config.invitation_ttl_hours,
    )
}

#[utoipa::path(
    post,
    path = "/api/organizations/{organization_id}/invitations",
    tag = INVITATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    request_body = CreateInvitationDto,
    responses(
        (status = 201, description = "Invitation created and emailed", body = InvitationDto),
        (status = 400, description = "Invalid email or role", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 409, description = "Already a member or already invited", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Json(payload): Json<CreateInvitationDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let role = parse_input::<OrgRole>("role", &payload.role)?;
    let invitation = invitation_service(&state)
        .create(&actor, organization_id, &payload.email, role)
        .await?;

    Ok((StatusCode::CREATED, Json(invitation.into_dto(Utc::now()))))
}

#[utoipa::path(
    get,
    path = "/api/organizations/{organization_id}/invitations",
    tag = INVITATION_TAG,
    params(
        ("organization_id" = i32, Path, description = "Organization ID"),
        InvitationFilterParams,
        PaginationParams
    ),
    responses(
        (status = 200, description = "Invitations of the organization", body = PaginatedDto<InvitationDto>),
        (status = 400, description = "Unknown status filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_organization_invitations(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Query(filter): Query<InvitationFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let status = filter
        .status
        .as_deref()
        .map(|s| parse_input::<InvitationStatus>("status", s))
        .transpose()?;

    let invitations = invitation_service(&state)
        .list_for_organization(&actor, organization_id, status, pagination.into())
        .await?;

    let now = Utc::now();
    Ok((
        StatusCode::OK,
        Json(invitations.into_dto(|invitation| invitation.into_dto(now))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/invitations/mine",
    tag = INVITATION_TAG,
    responses(
        (status = 200, description = "Pending invitations addressed to the caller's email", body = Vec<InvitationDetailsDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_my_invitations(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let invitations = invitation_service(&state).list_mine(&actor).await?;

    let now = Utc::now();
    let dto: Vec<InvitationDetailsDto> = invitations
        .into_iter()
        .map(|details| details.into_dto(now))
        .collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/invitations/{token}",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token from the email link")),
    responses(
        (status = 200, description = "What the invitation is for", body = InvitationDetailsDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = invitation_service(&state).get_by_token(&token).await?;

    Ok((StatusCode::OK, Json(details.into_dto(Utc::now()))))
}

#[utoipa::path(
    post,
    path = "/api/invitations/{token}/accept",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token from the email link")),
    responses(
        (status = 200, description = "Joined the organization", body = InvitationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Invitation was sent to another email", body = ErrorDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 409, description = "Invitation expired or already answered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let invitation = invitation_service(&state).accept(&actor, &token).await?;

    Ok((StatusCode::OK, Json(invitation.into_dto(Utc::now()))))
}

#[utoipa::path(
    post,
    path = "/api/invitations/{token}/decline",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token from the email link")),
    responses(
        (status = 200, description = "Invitation declined", body = InvitationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Invitation was sent to another email", body = ErrorDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 409, description = "Invitation expired or already answered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn decline_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let invitation = invitation_service(&state).decline(&actor, &token).await?;

    Ok((StatusCode::OK, Json(invitation.into_dto(Utc::now()))))
}

#[utoipa::path(
    delete,
    path = "/api/organization-invitations/{invitation_id}",
    tag = INVITATION_TAG,
    params(("invitation_id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Invitation cancelled", body = InvitationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 409, description = "Invitation is no longer pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let invitation = invitation_service(&state)
        .cancel(&actor, invitation_id)
        .await?;

    Ok((StatusCode::OK, Json(invitation.into_dto(Utc::now()))))
}

#[utoipa::path(
    post,
    path = "/api/organization-invitations/{invitation_id}/resend",
    tag = INVITATION_TAG,
    params(("invitation_id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Invitation reissued with a fresh token and expiry", body = InvitationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 409, description = "Invitation was already answered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn resend_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let invitation = invitation_service(&state)
        .resend(&actor, invitation_id)
        .await?;

    Ok((StatusCode::OK, Json(invitation.into_dto(Utc::now()))))
}

/// Lets an external cron trigger the expiry sweep in addition to the built-in schedule.
#[utoipa::path(
    post,
    path = "/api/cron/invitations/cleanup",
    tag = INVITATION_TAG,
    responses(
        (status = 200, description = "Overdue invitations marked expired", body = CleanupResultDto),
        (status = 401, description = "Missing or wrong cron secret", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cleanup_invitations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    authorize_cron(&headers, &state.config.cron_secret)?;

    let expired = invitation_service(&state).cleanup_expired().await?;

    Ok((StatusCode::OK, Json(CleanupResultDto { expired })))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn accepts_matching_bearer_secret() {
        assert!(authorize_cron(&headers("Bearer cron-secret"), "cron-secret").is_ok());
    }

    #[test]
    fn rejects_missing_or_wrong_secret() {
        assert!(matches!(
            authorize_cron(&HeaderMap::new(), "cron-secret"),
            Err(AuthError::InvalidCronSecret)
        ));
        assert!(matches!(
            authorize_cron(&headers("Bearer cron-secreT"), "cron-secret"),
            Err(AuthError::InvalidCronSecret)
        ));
        assert!(matches!(
            authorize_cron(&headers("cron-secret"), "cron-secret"),
            Err(AuthError::InvalidCronSecret)
        ));
    }
}
