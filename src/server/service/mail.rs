//! Outgoing email through a transactional mail HTTP API.
//!
//! The service posts a small JSON document to `MAIL_API_URL` with the API key as a
//! bearer token. Without mail configuration every message is logged and dropped, which
//! keeps local development and tests free of network calls.

use serde::Serialize;

use crate::server::{config::MailConfig, error::AppError};

/// A plain text message for a single recipient.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct MailService {
    http_client: reqwest::Client,
    config: Option<MailConfig>,
}

impl MailService {
    pub fn new(http_client: reqwest::Client, config: Option<MailConfig>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// A mailer that never sends, for tests and unconfigured deployments.
    pub fn disabled() -> Self {
        Self::new(reqwest::Client::new(), None)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Delivers `message`.
    ///
    /// # Returns
    /// - `Ok(true)` - The mail API accepted the message
    /// - `Ok(false)` - Mail is not configured, the message was only logged
    /// - `Err(AppError::ReqwestErr)` - Request failed or the API answered with an error status
    pub async fn send(&self, message: &MailMessage) -> Result<bool, AppError> {
        let Some(config) = &self.config else {
            tracing::info!(
                "Mail not configured, skipping message '{}' to {}",
                message.subject,
                message.to
            );
            return Ok(false);
        };

        self.http_client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&MailRequest {
                from: &config.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.text,
            })
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Sent mail '{}' to {}", message.subject, message.to);

        Ok(true)
    }
}

/// Builds the invitation email pointing at `link`.
pub fn invitation_message(
    to: &str,
    organization_name: &str,
    role: &str,
    link: &str,
) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: format!("You're invited to join {}", organization_name),
        text: format!(
            "You have been invited to join {} as {}.\n\nOpen the link below to accept or decline:\n{}\n",
            organization_name, role, link
        ),
    }
}
