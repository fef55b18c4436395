use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        audit::{self, AUDIT_TAG},
        auth::{self, AUTH_TAG},
        club::{self, CLUB_TAG},
        course::{self, COURSE_TAG},
        follow::{self, FOLLOW_TAG},
        invitation::{self, INVITATION_TAG},
        job::{self, JOB_TAG},
        notification::{self, NOTIFICATION_TAG},
        organization::{self, ORGANIZATION_TAG},
        post::{self, POST_TAG},
        research::{self, RESEARCH_TAG},
        user::{self, USER_TAG},
    },
    error::{config::ConfigError, AppError},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Scholarly API", description = "Academic network backend"),
    tags(
        (name = AUTH_TAG, description = "OAuth login and session"),
        (name = USER_TAG, description = "Profiles and user search"),
        (name = FOLLOW_TAG, description = "Follows and follow requests"),
        (name = ORGANIZATION_TAG, description = "Organizations, schools and faculties"),
        (name = INVITATION_TAG, description = "Organization invitations"),
        (name = COURSE_TAG, description = "Courses, approval workflow and enrollment"),
        (name = POST_TAG, description = "Posts, comments, likes and feed"),
        (name = NOTIFICATION_TAG, description = "In-app notifications"),
        (name = JOB_TAG, description = "Job postings and applications"),
        (name = RESEARCH_TAG, description = "Research projects and collaboration"),
        (name = CLUB_TAG, description = "Clubs and events"),
        (name = AUDIT_TAG, description = "Audit log and restore of deleted rows"),
    )
)]
struct ApiDoc;

/// Builds the application router with API docs, CORS, tracing and rate limiting.
///
/// # Returns
/// - `Ok(Router)` - Router with state applied, ready for the session layer
/// - `Err(AppError::ConfigErr)` - `APP_URL` is not a valid origin header value
pub fn router(state: AppState) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(&state.config.app_url).map_err(|e| {
        ConfigError::InvalidEnvVar {
            name: "APP_URL".to_string(),
            reason: e.to_string(),
        }
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    // Per client IP: bursts of 50, refilling one request every 100ms.
    let governor = GovernorConfigBuilder::default()
        .per_millisecond(100)
        .burst_size(50)
        .finish()
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            name: "rate limit".to_string(),
            reason: "period and burst size must be non-zero".to_string(),
        })?;

    let (api_router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api_routes())
        .split_for_parts();

    let router = api_router
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(GovernorLayer::new(Arc::new(governor)))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        // auth
        .routes(routes!(auth::login))
        .routes(routes!(auth::callback))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        // users
        .routes(routes!(user::get_profile))
        .routes(routes!(user::update_profile))
        .routes(routes!(user::search_users))
        .routes(routes!(user::get_followers))
        .routes(routes!(user::get_following))
        // follows
        .routes(routes!(follow::follow_user, follow::unfollow_user))
        .routes(routes!(follow::remove_follower))
        .routes(routes!(follow::get_incoming_requests))
        .routes(routes!(follow::get_outgoing_requests))
        .routes(routes!(follow::accept_request))
        .routes(routes!(follow::reject_request))
        .routes(routes!(follow::cancel_request))
        // organizations
        .routes(routes!(
            organization::create_organization,
            organization::get_organizations
        ))
        .routes(routes!(organization::get_my_organizations))
        .routes(routes!(
            organization::get_organization,
            organization::update_organization,
            organization::delete_organization
        ))
        .routes(routes!(organization::get_organization_by_slug))
        .routes(routes!(organization::get_members))
        .routes(routes!(
            organization::update_member_role,
            organization::remove_member
        ))
        .routes(routes!(organization::leave_organization))
        .routes(routes!(
            organization::create_school,
            organization::get_schools
        ))
        .routes(routes!(
            organization::update_school,
            organization::delete_school
        ))
        .routes(routes!(
            organization::create_faculty,
            organization::get_faculties
        ))
        .routes(routes!(organization::delete_faculty))
        .routes(routes!(
            organization::get_faculty_members,
            organization::add_faculty_member
        ))
        .routes(routes!(organization::remove_faculty_member))
        // invitations
        .routes(routes!(
            invitation::create_invitation,
            invitation::get_organization_invitations
        ))
        .routes(routes!(invitation::get_my_invitations))
        .routes(routes!(invitation::get_invitation))
        .routes(routes!(invitation::accept_invitation))
        .routes(routes!(invitation::decline_invitation))
        .routes(routes!(invitation::cancel_invitation))
        .routes(routes!(invitation::resend_invitation))
        .routes(routes!(invitation::cleanup_invitations))
        // courses
        .routes(routes!(
            course::create_course,
            course::get_organization_courses
        ))
        .routes(routes!(
            course::get_course,
            course::update_course,
            course::delete_course
        ))
        .routes(routes!(course::submit_course))
        .routes(routes!(course::get_approval_history))
        .routes(routes!(course::get_review_queue))
        .routes(routes!(course::review_course))
        .routes(routes!(course::enroll, course::unenroll))
        .routes(routes!(course::get_enrollments))
        .routes(routes!(course::get_my_enrollments))
        // posts
        .routes(routes!(post::create_post))
        .routes(routes!(post::get_feed))
        .routes(routes!(post::get_user_posts))
        .routes(routes!(post::get_post, post::update_post, post::delete_post))
        .routes(routes!(post::like_post, post::unlike_post))
        .routes(routes!(post::create_comment, post::get_comments))
        .routes(routes!(post::delete_comment))
        // notifications
        .routes(routes!(notification::get_notifications))
        .routes(routes!(notification::get_unread_count))
        .routes(routes!(notification::mark_read))
        .routes(routes!(notification::mark_all_read))
        .routes(routes!(notification::delete_notification))
        // jobs
        .routes(routes!(job::create_job, job::get_jobs))
        .routes(routes!(job::get_job, job::update_job, job::delete_job))
        .routes(routes!(job::close_job))
        .routes(routes!(job::apply, job::get_job_applications))
        .routes(routes!(job::get_my_applications))
        .routes(routes!(job::withdraw_application))
        .routes(routes!(job::update_application_status))
        // research
        .routes(routes!(
            research::create_research,
            research::get_research_list
        ))
        .routes(routes!(
            research::get_research,
            research::update_research,
            research::delete_research
        ))
        .routes(routes!(
            research::request_collaboration,
            research::get_collaborators
        ))
        .routes(routes!(research::respond_to_collaboration))
        .routes(routes!(research::leave_research))
        // clubs and events
        .routes(routes!(club::create_club, club::get_clubs))
        .routes(routes!(club::get_club, club::delete_club))
        .routes(routes!(club::get_club_members))
        .routes(routes!(club::join_club, club::leave_club))
        .routes(routes!(club::create_event, club::get_upcoming_events))
        .routes(routes!(club::get_event, club::delete_event))
        .routes(routes!(club::rsvp, club::cancel_rsvp))
        // audit
        .routes(routes!(audit::get_audit_log))
        .routes(routes!(audit::restore))
}
