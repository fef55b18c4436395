//! One-time bootstrap code that lets the first login claim platform admin rights.
//!
//! The code lives only in memory. It is generated at startup when no admin account
//! exists, printed to the log, and consumed by the OAuth callback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::server::util::token::{random_alphanumeric, secrets_match};

/// How long a generated code stays redeemable.
pub const ADMIN_CODE_TTL: Duration = Duration::from_secs(60);

const ADMIN_CODE_LENGTH: usize = 32;

#[derive(Clone)]
struct IssuedCode {
    value: String,
    issued_at: Instant,
}

impl IssuedCode {
    fn is_live(&self, ttl: Duration) -> bool {
        self.issued_at.elapsed() < ttl
    }
}

/// Holds at most one live admin bootstrap code.
#[derive(Clone)]
pub struct AdminCodeService {
    current: Arc<RwLock<Option<IssuedCode>>>,
    ttl: Duration,
}

impl AdminCodeService {
    pub fn new() -> Self {
        Self::with_ttl(ADMIN_CODE_TTL)
    }

    /// Builds a service whose codes expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Issues a fresh code, replacing any previous one.
    ///
    /// # Returns
    /// - `String` - The 32-character alphanumeric code
    pub async fn generate(&self) -> String {
        let value = random_alphanumeric(ADMIN_CODE_LENGTH);

        *self.current.write().await = Some(IssuedCode {
            value: value.clone(),
            issued_at: Instant::now(),
        });

        value
    }

    /// Redeems `input` against the live code.
    ///
    /// A matching code is cleared so it can only be used once. An expired code is
    /// cleared as well. A wrong guess leaves a live code in place.
    ///
    /// # Returns
    /// - `true` - `input` matched a live code, which is now consumed
    /// - `false` - No live code, or `input` did not match
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut current = self.current.write().await;

        let Some(issued) = current.as_ref() else {
            return false;
        };

        if !issued.is_live(self.ttl) {
            *current = None;
            return false;
        }

        if !secrets_match(input, &issued.value) {
            return false;
        }

        *current = None;
        true
    }

    #[cfg(test)]
    pub async fn has_valid_code(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|issued| issued.is_live(self.ttl))
    }
}

impl Default for AdminCodeService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that a generated code is live and 32 characters long.
    #[tokio::test]
    async fn test_generate_code() {
        let service = AdminCodeService::new();
        assert!(!service.has_valid_code().await);

        let code = service.generate().await;

        assert_eq!(code.len(), 32);
        assert!(service.has_valid_code().await);
    }

    /// Tests that the correct code is accepted once and then consumed.
    ///
    /// Expected: first redemption succeeds, second fails
    #[tokio::test]
    async fn test_code_is_single_use() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        assert!(service.validate_and_consume(&code).await);
        assert!(!service.has_valid_code().await);
        assert!(!service.validate_and_consume(&code).await);
    }

    /// Tests that a wrong guess leaves the live code redeemable.
    #[tokio::test]
    async fn test_wrong_code_keeps_live_code() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        assert!(!service.validate_and_consume("wrong_code").await);
        assert!(service.validate_and_consume(&code).await);
    }

    /// Tests redeeming when nothing was issued.
    #[tokio::test]
    async fn test_validate_without_code() {
        let service = AdminCodeService::new();
        assert!(!service.validate_and_consume("any_code").await);
    }

    /// Tests that regenerating replaces the previous code.
    #[tokio::test]
    async fn test_regenerate_replaces_code() {
        let service = AdminCodeService::new();
        let first = service.generate().await;
        let second = service.generate().await;

        assert!(!service.validate_and_consume(&first).await);
        assert!(service.validate_and_consume(&second).await);
    }

    /// Tests that an expired code is rejected and cleared.
    ///
    /// Expected: Ok with redemption failing after the ttl elapsed
    #[tokio::test]
    async fn test_expired_code_is_rejected() {
        let service = AdminCodeService::with_ttl(Duration::from_millis(20));
        let code = service.generate().await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!service.has_valid_code().await);
        assert!(!service.validate_and_consume(&code).await);
    }
}
