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
        organization::{
            AddFacultyMemberDto, CreateOrganizationDto, FacultyDto, FacultyMemberDto, MemberDto,
            OrganizationDto, SchoolDto, UnitDto, UpdateMemberRoleDto, UpdateOrganizationDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::organization::{
            CreateOrganizationParam, OrgRole, UnitParam, UpdateOrganizationParam,
        },
        service::organization::OrganizationService,
        state::AppState,
        util::parse::parse_input,
    },
};

pub static ORGANIZATION_TAG: &str = "organization";

#[utoipa::path(
    post,
    path = "/api/organizations",
    tag = ORGANIZATION_TAG,
    request_body = CreateOrganizationDto,
    responses(
        (status = 201, description = "Organization created, the caller is its owner", body = OrganizationDto),
        (status = 400, description = "Invalid organization data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Slug already taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_organization(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateOrganizationDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organization = OrganizationService::new(&state.db)
        .create(
            &actor,
            CreateOrganizationParam {
                name: payload.name,
                slug: payload.slug,
                description: payload.description,
                website: payload.website,
                created_by: actor.id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(organization.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = ORGANIZATION_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "All organizations", body = PaginatedDto<OrganizationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_organizations(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organizations = OrganizationService::new(&state.db)
        .list(pagination.into())
        .await?;

    Ok((
        StatusCode::OK,
        Json(organizations.into_dto(|organization| organization.into_dto())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/organizations/mine",
    tag = ORGANIZATION_TAG,
    responses(
        (status = 200, description = "Organizations the caller belongs to", body = Vec<OrganizationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_my_organizations(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organizations = OrganizationService::new(&state.db)
        .list_mine(&actor)
        .await?;

    let dto: Vec<OrganizationDto> = organizations.into_iter().map(|o| o.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/organizations/{organization_id}",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "The organization", body = OrganizationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_organization(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organization = OrganizationService::new(&state.db)
        .get(organization_id)
        .await?;

    Ok((StatusCode::OK, Json(organization.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/organizations/by-slug/{slug}",
    tag = ORGANIZATION_TAG,
    params(("slug" = String, Path, description = "Organization slug")),
    responses(
        (status = 200, description = "The organization", body = OrganizationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_organization_by_slug(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organization = OrganizationService::new(&state.db)
        .get_by_slug(&slug)
        .await?;

    Ok((StatusCode::OK, Json(organization.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/organizations/{organization_id}",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    request_body = UpdateOrganizationDto,
    responses(
        (status = 200, description = "Updated organization", body = OrganizationDto),
        (status = 400, description = "Invalid organization data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_organization(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Json(payload): Json<UpdateOrganizationDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let organization = OrganizationService::new(&state.db)
        .update(&actor, organization_id, UpdateOrganizationParam::from(payload))
        .await?;

    Ok((StatusCode::OK, Json(organization.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/organizations/{organization_id}",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 204, description = "Organization soft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .delete(&actor, organization_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/organizations/{organization_id}/members",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID"), PaginationParams),
    responses(
        (status = 200, description = "Members with their roles", body = PaginatedDto<MemberDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = OrganizationService::new(&state.db)
        .members(organization_id, pagination.into())
        .await?;

    Ok((StatusCode::OK, Json(members.into_dto(|member| member.into_dto()))))
}

#[utoipa::path(
    put,
    path = "/api/organizations/{organization_id}/members/{user_id}",
    tag = ORGANIZATION_TAG,
    params(
        ("organization_id" = i32, Path, description = "Organization ID"),
        ("user_id" = i32, Path, description = "Member's user ID"),
    ),
    request_body = UpdateMemberRoleDto,
    responses(
        (status = 204, description = "Role changed"),
        (status = 400, description = "Unknown role", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not grant or change this role", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 409, description = "Would leave the organization without an owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_member_role(
    State(state): State<AppState>,
    session: Session,
    Path((organization_id, user_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateMemberRoleDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let role = parse_input::<OrgRole>("role", &payload.role)?;
    OrganizationService::new(&state.db)
        .change_role(&actor, organization_id, user_id, role)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/organizations/{organization_id}/members/{user_id}",
    tag = ORGANIZATION_TAG,
    params(
        ("organization_id" = i32, Path, description = "Organization ID"),
        ("user_id" = i32, Path, description = "Member's user ID"),
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not remove this member", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 409, description = "Would remove the last owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_member(
    State(state): State<AppState>,
    session: Session,
    Path((organization_id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .remove_member(&actor, organization_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/organizations/{organization_id}/leave",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 204, description = "Left the organization"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Not a member", body = ErrorDto),
        (status = 409, description = "The last owner cannot leave", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_organization(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .leave(&actor, organization_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/organizations/{organization_id}/schools",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    request_body = UnitDto,
    responses(
        (status = 201, description = "School created", body = SchoolDto),
        (status = 400, description = "Invalid school data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_school(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
    Json(payload): Json<UnitDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let school = OrganizationService::new(&state.db)
        .create_school(&actor, organization_id, UnitParam::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(school.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/organizations/{organization_id}/schools",
    tag = ORGANIZATION_TAG,
    params(("organization_id" = i32, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Schools of the organization", body = Vec<SchoolDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Organization not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_schools(
    State(state): State<AppState>,
    session: Session,
    Path(organization_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let schools = OrganizationService::new(&state.db)
        .schools(organization_id)
        .await?;

    let dto: Vec<SchoolDto> = schools.into_iter().map(|s| s.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    put,
    path = "/api/schools/{school_id}",
    tag = ORGANIZATION_TAG,
    params(("school_id" = i32, Path, description = "School ID")),
    request_body = UnitDto,
    responses(
        (status = 200, description = "Updated school", body = SchoolDto),
        (status = 400, description = "Invalid school data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "School not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_school(
    State(state): State<AppState>,
    session: Session,
    Path(school_id): Path<i32>,
    Json(payload): Json<UnitDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let school = OrganizationService::new(&state.db)
        .update_school(&actor, school_id, UnitParam::from(payload))
        .await?;

    Ok((StatusCode::OK, Json(school.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/schools/{school_id}",
    tag = ORGANIZATION_TAG,
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 204, description = "School deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "School not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_school(
    State(state): State<AppState>,
    session: Session,
    Path(school_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .delete_school(&actor, school_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/schools/{school_id}/faculties",
    tag = ORGANIZATION_TAG,
    params(("school_id" = i32, Path, description = "School ID")),
    request_body = UnitDto,
    responses(
        (status = 201, description = "Faculty created", body = FacultyDto),
        (status = 400, description = "Invalid faculty data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "School not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_faculty(
    State(state): State<AppState>,
    session: Session,
    Path(school_id): Path<i32>,
    Json(payload): Json<UnitDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let faculty = OrganizationService::new(&state.db)
        .create_faculty(&actor, school_id, UnitParam::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(faculty.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/schools/{school_id}/faculties",
    tag = ORGANIZATION_TAG,
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Faculties of the school", body = Vec<FacultyDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "School not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_faculties(
    State(state): State<AppState>,
    session: Session,
    Path(school_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let faculties = OrganizationService::new(&state.db)
        .faculties(school_id)
        .await?;

    let dto: Vec<FacultyDto> = faculties.into_iter().map(|f| f.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    delete,
    path = "/api/faculties/{faculty_id}",
    tag = ORGANIZATION_TAG,
    params(("faculty_id" = i32, Path, description = "Faculty ID")),
    responses(
        (status = 204, description = "Faculty deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Faculty not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_faculty(
    State(state): State<AppState>,
    session: Session,
    Path(faculty_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .delete_faculty(&actor, faculty_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/faculties/{faculty_id}/members",
    tag = ORGANIZATION_TAG,
    params(("faculty_id" = i32, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty members with their titles", body = Vec<FacultyMemberDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Faculty not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_faculty_members(
    State(state): State<AppState>,
    session: Session,
    Path(faculty_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = OrganizationService::new(&state.db)
        .faculty_members(faculty_id)
        .await?;

    let dto: Vec<FacultyMemberDto> = members.into_iter().map(|m| m.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    post,
    path = "/api/faculties/{faculty_id}/members",
    tag = ORGANIZATION_TAG,
    params(("faculty_id" = i32, Path, description = "Faculty ID")),
    request_body = AddFacultyMemberDto,
    responses(
        (status = 204, description = "Member added to the faculty"),
        (status = 400, description = "User is not a member of the organization", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Faculty not found", body = ErrorDto),
        (status = 409, description = "Already a faculty member", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_faculty_member(
    State(state): State<AppState>,
    session: Session,
    Path(faculty_id): Path<i32>,
    Json(payload): Json<AddFacultyMemberDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .add_faculty_member(&actor, faculty_id, payload.user_id, payload.title)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/faculties/{faculty_id}/members/{user_id}",
    tag = ORGANIZATION_TAG,
    params(
        ("faculty_id" = i32, Path, description = "Faculty ID"),
        ("user_id" = i32, Path, description = "Member's user ID"),
    ),
    responses(
        (status = 204, description = "Member removed from the faculty"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an owner or admin", body = ErrorDto),
        (status = 404, description = "Faculty member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_faculty_member(
    State(state): State<AppState>,
    session: Session,
    Path((faculty_id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    OrganizationService::new(&state.db)
        .remove_faculty_member(&actor, faculty_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
