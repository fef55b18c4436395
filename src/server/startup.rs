use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use sea_orm::{DatabaseConnection, DbErr};
use time::Duration;
use tower_sessions::{
    cookie::SameSite, session_store::ExpiredDeletion, Expiry, SessionManagerLayer,
};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config,
    data::user::UserRepository,
    error::{config::ConfigError, AppError},
    service::admin::code::AdminCodeService,
    state::OAuth2Client,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Interval between sweeps of expired session rows.
const SESSION_CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Creates the session layer backed by the application database.
///
/// The store creates its own table on startup and a background task deletes expired
/// sessions every hour. Sessions expire after seven days of inactivity.
pub async fn connect_to_session(
    db: &DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let session_store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
    session_store
        .migrate()
        .await
        .map_err(|e| DbErr::Custom(e.to_string()))?;

    tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(SESSION_CLEANUP_INTERVAL),
    );

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7))))
}

/// Builds the shared HTTP client.
///
/// Redirects are disabled so a misbehaving identity provider or mail API cannot
/// bounce requests to internal addresses.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the OAuth2 client from the identity provider settings.
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, AppError> {
    let client = oauth2::basic::BasicClient::new(ClientId::new(config.oauth.client_id.clone()))
        .set_client_secret(ClientSecret::new(config.oauth.client_secret.clone()))
        .set_auth_uri(
            AuthUrl::new(config.oauth.auth_url.clone()).map_err(invalid_url("OAUTH_AUTH_URL"))?,
        )
        .set_token_uri(
            TokenUrl::new(config.oauth.token_url.clone()).map_err(invalid_url("OAUTH_TOKEN_URL"))?,
        )
        .set_redirect_uri(
            RedirectUrl::new(config.oauth.redirect_url.clone())
                .map_err(invalid_url("OAUTH_REDIRECT_URL"))?,
        );

    Ok(client)
}

/// Maps a URL parse failure onto the environment variable it came from.
fn invalid_url(name: &'static str) -> impl Fn(url::ParseError) -> ConfigError {
    move |e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    }
}

/// Generates a one-time admin login link when no platform admin exists yet.
///
/// The link is only written to the log; whoever can read the server log can claim
/// the first admin account within the code's lifetime.
pub async fn check_for_admin(
    db: &DatabaseConnection,
    config: &Config,
    admin_code_service: &AdminCodeService,
) -> Result<(), AppError> {
    let user_repo = UserRepository::new(db);

    if user_repo.admin_exists().await? {
        return Ok(());
    }

    let code = admin_code_service.generate().await;

    tracing::info!(
        "No admin user exists. Log in within 60 seconds to become admin: {}/api/auth/login?code={}",
        config.app_url,
        code
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_auth_url(auth_url: &str) -> Config {
        Config::from_lookup(|name| {
            let value = match name {
                "DATABASE_URL" => "sqlite::memory:",
                "APP_URL" => "https://scholarly.example",
                "OAUTH_CLIENT_ID" => "client",
                "OAUTH_CLIENT_SECRET" => "secret",
                "OAUTH_AUTH_URL" => auth_url,
                "OAUTH_TOKEN_URL" => "https://idp.example/token",
                "OAUTH_USERINFO_URL" => "https://idp.example/userinfo",
                "OAUTH_REDIRECT_URL" => "https://scholarly.example/api/auth/callback",
                "CRON_SECRET" => "cron",
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap()
    }

    #[test]
    fn builds_oauth_client() {
        let config = config_with_auth_url("https://idp.example/authorize");
        assert!(setup_oauth_client(&config).is_ok());
    }

    #[test]
    fn names_the_invalid_oauth_url() {
        let config = config_with_auth_url("not a url");

        match setup_oauth_client(&config) {
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { name, .. })) => {
                assert_eq!(name, "OAUTH_AUTH_URL")
            }
            other => panic!("Expected InvalidEnvVar, got {:?}", other.map(|_| ())),
        }
    }
}
