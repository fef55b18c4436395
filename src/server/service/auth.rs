//! OAuth2 authorization-code login against an external identity provider.

use oauth2::{
    basic::BasicTokenType, AuthorizationCode, CsrfToken, EmptyExtraTokenFields, Scope,
    StandardTokenResponse, TokenResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use url::Url;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::user::{UpsertUserParam, User},
    state::OAuth2Client,
    util::parse::{is_valid_email, normalize_email},
};

/// The subset of the provider's OpenID Connect user info response the service needs.
#[derive(Debug, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl IdentityClaims {
    /// Converts the claims into user upsert parameters.
    ///
    /// The email is normalized, and a missing or blank name falls back to the email's
    /// local part.
    pub fn into_param(self, is_admin: Option<bool>) -> Result<UpsertUserParam, AuthError> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AuthError::UserInfo(format!(
                "provider returned an invalid email '{}'",
                self.email
            )));
        }

        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(UpsertUserParam {
            auth_subject: self.sub,
            email,
            name,
            is_admin,
        })
    }
}

pub struct AuthService<'a> {
    pub db: &'a DatabaseConnection,
    pub http_client: &'a reqwest::Client,
    pub oauth_client: &'a OAuth2Client,
    pub userinfo_url: &'a str,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        userinfo_url: &'a str,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            userinfo_url,
        }
    }

    /// Builds the provider authorization URL together with the CSRF state token that
    /// the callback must echo back.
    ///
    /// # Returns
    /// - `(Url, CsrfToken)` - Redirect target and the state to keep in the session
    pub fn login_url(&self) -> (Url, CsrfToken) {
        self.oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url()
    }

    /// Completes the login after the provider redirected back.
    ///
    /// Exchanges the code for an access token, fetches the user's identity and creates
    /// or refreshes the matching user row.
    ///
    /// # Arguments
    /// - `authorization_code` - The `code` query parameter from the callback
    /// - `set_admin` - Grant platform admin rights (admin bootstrap flow)
    ///
    /// # Returns
    /// - `Ok(User)` - The logged in user
    /// - `Err(AppError::AuthErr)` - Token exchange failed or the identity was unusable
    /// - `Err(AppError::ReqwestErr)` - The user info request failed
    /// - `Err(AppError::DbErr)` - Database error during the upsert
    pub async fn callback(
        &self,
        authorization_code: String,
        set_admin: bool,
    ) -> Result<User, AppError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let claims = self.fetch_identity(&token).await?;
        // Only touch the admin flag when granting it, never revoke on login.
        let param = claims.into_param(set_admin.then_some(true))?;

        let user = UserRepository::new(self.db).upsert(param).await?;

        if set_admin {
            tracing::info!("User {} ({}) has been set as admin", user.id, user.username);
        }

        Ok(user)
    }

    async fn fetch_identity(
        &self,
        token: &StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    ) -> Result<IdentityClaims, AppError> {
        let claims = self
            .http_client
            .get(self.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?
            .error_for_status()?
            .json::<IdentityClaims>()
            .await?;

        Ok(claims)
    }
}
