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
        club::{
            ClubDto, ClubFilterParams, ClubMemberDto, CreateClubDto, CreateEventDto, EventDto,
            EventFilterParams,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::club::CreateClubParam,
        service::club::{ClubService, EventForm},
        state::AppState,
    },
};

pub static CLUB_TAG: &str = "club";

impl From<CreateEventDto> for EventForm {
    fn from(dto: CreateEventDto) -> Self {
        Self {
            club_id: dto.club_id,
            organization_id: dto.organization_id,
            title: dto.title,
            description: dto.description,
            location: dto.location,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            capacity: dto.capacity,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/clubs",
    tag = CLUB_TAG,
    request_body = CreateClubDto,
    responses(
        (status = 201, description = "Club founded, the caller leads it", body = ClubDto),
        (status = 400, description = "Invalid club data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a member of the organization", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_club(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateClubDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let club = ClubService::new(&state.db)
        .create(
            &actor,
            CreateClubParam {
                organization_id: payload.organization_id,
                name: payload.name,
                description: payload.description,
                created_by: actor.id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(club.into_dto(1))))
}

#[utoipa::path(
    get,
    path = "/api/clubs",
    tag = CLUB_TAG,
    params(ClubFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Clubs with member counts", body = PaginatedDto<ClubDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_clubs(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ClubFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let clubs = ClubService::new(&state.db)
        .list(filter.organization_id, pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(clubs.into_dto(|(club, member_count)| club.into_dto(member_count))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/clubs/{club_id}",
    tag = CLUB_TAG,
    params(("club_id" = i32, Path, description = "Club ID")),
    responses(
        (status = 200, description = "The club", body = ClubDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Club not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_club(
    State(state): State<AppState>,
    session: Session,
    Path(club_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let (club, member_count) = ClubService::new(&state.db).get(club_id).await?;

    Ok((StatusCode::OK, Json(club.into_dto(member_count))))
}

#[utoipa::path(
    delete,
    path = "/api/clubs/{club_id}",
    tag = CLUB_TAG,
    params(("club_id" = i32, Path, description = "Club ID")),
    responses(
        (status = 204, description = "Club soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a club leader", body = ErrorDto),
        (status = 404, description = "Club not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_club(
    State(state): State<AppState>,
    session: Session,
    Path(club_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db).delete(&actor, club_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/clubs/{club_id}/members",
    tag = CLUB_TAG,
    params(("club_id" = i32, Path, description = "Club ID")),
    responses(
        (status = 200, description = "Club members with their roles", body = Vec<ClubMemberDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Club not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_club_members(
    State(state): State<AppState>,
    session: Session,
    Path(club_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = ClubService::new(&state.db).members(club_id).await?;

    let dto: Vec<ClubMemberDto> = members.into_iter().map(|m| m.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    post,
    path = "/api/clubs/{club_id}/membership",
    tag = CLUB_TAG,
    params(("club_id" = i32, Path, description = "Club ID")),
    responses(
        (status = 204, description = "Joined the club"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Club not found", body = ErrorDto),
        (status = 409, description = "Already a member", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn join_club(
    State(state): State<AppState>,
    session: Session,
    Path(club_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db).join(&actor, club_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/clubs/{club_id}/membership",
    tag = CLUB_TAG,
    params(("club_id" = i32, Path, description = "Club ID")),
    responses(
        (status = 204, description = "Left the club"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Club not found or not a member", body = ErrorDto),
        (status = 409, description = "The last leader cannot leave", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_club(
    State(state): State<AppState>,
    session: Session,
    Path(club_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db).leave(&actor, club_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = CLUB_TAG,
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event scheduled", body = EventDto),
        (status = 400, description = "Invalid event data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller lacks the club or organization role", body = ErrorDto),
        (status = 404, description = "Club or organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateEventDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let club_service = ClubService::new(&state.db);
    let event = club_service
        .create_event(&actor, EventForm::from(payload))
        .await?;
    let view = club_service.get_event(&actor, event.id).await?;

    Ok((StatusCode::CREATED, Json(view.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = CLUB_TAG,
    params(EventFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Events that have not ended, soonest first", body = PaginatedDto<EventDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_upcoming_events(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<EventFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let events = ClubService::new(&state.db)
        .upcoming_events(
            &viewer,
            filter.club_id,
            filter.organization_id,
            pagination.into(),
        )
        .await?;

    Ok((StatusCode::OK, Json(events.into_dto(|e| e.into_dto()))))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = CLUB_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "The event with attendance", body = EventDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let event = ClubService::new(&state.db)
        .get_event(&viewer, event_id)
        .await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    tag = CLUB_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the event", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db)
        .delete_event(&actor, event_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/rsvp",
    tag = CLUB_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Attending"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 409, description = "Already attending or the event is full", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn rsvp(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db).rsvp(&actor, event_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/rsvp",
    tag = CLUB_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "RSVP cancelled"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Event not found or not attending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_rsvp(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ClubService::new(&state.db)
        .cancel_rsvp(&actor, event_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
