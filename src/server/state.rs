//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::{
    config::Config,
    service::{admin::code::AdminCodeService, mail::MailService},
};

/// Type alias for the OAuth2 client configured with authorization and token endpoints.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `reqwest::Client` uses an `Arc` internally
/// - `OAuth2Client` is designed to be cloned
/// - `AdminCodeService` uses `Arc` for shared state
/// - `Config` is shared behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// HTTP client for the identity provider and the mail API.
    ///
    /// Configured without redirects to prevent SSRF through redirect chains.
    pub http_client: reqwest::Client,

    /// OAuth2 client for the login flow.
    pub oauth_client: OAuth2Client,

    /// Service for managing temporary admin codes.
    pub admin_code_service: AdminCodeService,

    /// Sends invitation emails.
    pub mail_service: MailService,

    /// Runtime configuration (app url, cron secret, invitation ttl, ...).
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        admin_code_service: AdminCodeService,
        mail_service: MailService,
        config: Config,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            admin_code_service,
            mail_service,
            config: Arc::new(config),
        }
    }
}
