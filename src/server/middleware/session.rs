//! Type-safe session management wrappers.
//!
//! Each struct wraps the same underlying `Session` but exposes only the keys of one
//! concern:
//! - `AuthSession` - The logged in user's id
//! - `CsrfSession` - CSRF token for the OAuth login flow
//! - `OAuthFlowSession` - State carried across the provider redirect (admin code)

use tower_sessions::Session;

use crate::server::error::AppError;

pub(crate) const SESSION_AUTH_USER_ID: &str = "auth:user";
const SESSION_AUTH_CSRF_TOKEN: &str = "auth:csrf_token";
const SESSION_AUTH_SET_ADMIN: &str = "auth:set_admin";

/// Authentication session management.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the user id after a successful login.
    ///
    /// The session id is cycled first so a session fixed before login cannot be reused.
    ///
    /// # Returns
    /// - `Ok(())` - User id stored
    /// - `Err(AppError::SessionErr(_))` - Failed to write the session
    pub async fn set_user_id(&self, user_id: i32) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// The logged in user's id, if any.
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        Ok(self.session.get::<i32>(SESSION_AUTH_USER_ID).await?)
    }

    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.get_user_id().await?.is_some())
    }

    /// Removes every key from the session and deletes it from the store.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}

/// CSRF protection for the OAuth login flow.
pub struct CsrfSession<'a> {
    session: &'a Session,
}

impl<'a> CsrfSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn set_token(&self, token: String) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_CSRF_TOKEN, token).await?;
        Ok(())
    }

    /// Retrieves and removes the CSRF token, so each token validates one callback only.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - Token found and removed
    /// - `Ok(None)` - No login flow in progress
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn take_token(&self) -> Result<Option<String>, AppError> {
        let token = self.session.remove(SESSION_AUTH_CSRF_TOKEN).await?;
        Ok(token)
    }
}

/// State that has to survive the redirect to the identity provider and back.
pub struct OAuthFlowSession<'a> {
    session: &'a Session,
}

impl<'a> OAuthFlowSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Marks that a valid admin code was presented when the login started.
    pub async fn set_admin_flag(&self, set_admin: bool) -> Result<(), AppError> {
        self.session
            .insert(SESSION_AUTH_SET_ADMIN, set_admin)
            .await?;
        Ok(())
    }

    /// Retrieves and removes the admin flag. Absent means `false`.
    pub async fn take_admin_flag(&self) -> Result<bool, AppError> {
        let set_admin = self
            .session
            .remove(SESSION_AUTH_SET_ADMIN)
            .await?
            .unwrap_or(false);
        Ok(set_admin)
    }
}
