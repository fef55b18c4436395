use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_INVITATION_TTL_HOURS: i64 = 168;
/// One year.
pub const MAX_INVITATION_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_INVITATION_CLEANUP_CRON: &str = "0 0 * * * *";

/// Endpoints and credentials of the OAuth2 identity provider.
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
}

/// Transactional email API settings. Mail is skipped when absent.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub bind_address: String,

    pub oauth: OAuthConfig,

    pub cron_secret: String,
    pub invitation_ttl_hours: i64,
    pub invitation_cleanup_cron: String,

    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let invitation_ttl_hours = match lookup("INVITATION_TTL_HOURS") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_INVITATION_TTL_HOURS).contains(hours))
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    name: "INVITATION_TTL_HOURS".to_string(),
                    reason: format!(
                        "expected between 1 and {} hours, got '{}'",
                        MAX_INVITATION_TTL_HOURS, value
                    ),
                })?,
            None => DEFAULT_INVITATION_TTL_HOURS,
        };

        let mail = match (
            lookup("MAIL_API_URL"),
            lookup("MAIL_API_KEY"),
            lookup("MAIL_FROM"),
        ) {
            (Some(api_url), Some(api_key), Some(from)) => Some(MailConfig {
                api_url,
                api_key,
                from,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            app_url: required("APP_URL")?.trim_end_matches('/').to_string(),
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            oauth: OAuthConfig {
                client_id: required("OAUTH_CLIENT_ID")?,
                client_secret: required("OAUTH_CLIENT_SECRET")?,
                auth_url: required("OAUTH_AUTH_URL")?,
                token_url: required("OAUTH_TOKEN_URL")?,
                userinfo_url: required("OAUTH_USERINFO_URL")?,
                redirect_url: required("OAUTH_REDIRECT_URL")?,
            },
            cron_secret: required("CRON_SECRET")?,
            invitation_ttl_hours,
            invitation_cleanup_cron: lookup("INVITATION_CLEANUP_CRON")
                .unwrap_or_else(|| DEFAULT_INVITATION_CLEANUP_CRON.to_string()),
            mail,
        })
    }
}
