// Bearer token acquisition
// Author: kelexine (https://github.com/kelexine)

mod adc;
mod jwt;

pub use adc::{ApplicationDefaultCredentials, CredentialsFile};

use crate::error::Result;
use async_trait::async_trait;
use zeroize::Zeroize;

/// A short-lived OAuth2 bearer token.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AccessToken {
    token: String,
    /// Expiry as a unix timestamp in milliseconds, when the issuer reported one.
    expiry_date: Option<i64>,
}

// Custom Debug impl that never logs tokens
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_in_seconds: Option<i64>) -> Self {
        let expiry_date = expires_in_seconds
            .map(|secs| chrono::Utc::now().timestamp_millis() + secs * 1000);
        Self {
            token: token.into(),
            expiry_date,
        }
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Get remaining time until expiry in seconds
    pub fn expires_in_seconds(&self) -> Option<i64> {
        let now = chrono::Utc::now().timestamp_millis();
        self.expiry_date.map(|expiry| (expiry - now) / 1000)
    }
}

/// Source of bearer tokens for upstream calls.
///
/// Implementations fetch a fresh token on every call; callers never hold a
/// token beyond the request it was acquired for.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn acquire_token(&self) -> Result<AccessToken>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_impl_masks_token() {
        let token = AccessToken::new("ya29.secret", Some(3600));

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("ya29"));
    }

    #[test]
    fn test_expiry_tracking() {
        let token = AccessToken::new("test", Some(3600));
        let remaining = token.expires_in_seconds().unwrap();
        assert!(remaining > 3500 && remaining <= 3600);

        let no_expiry = AccessToken::new("test", None);
        assert_eq!(no_expiry.expires_in_seconds(), None);
    }

    #[test]
    fn test_bearer_header() {
        let token = AccessToken::new("abc", None);
        assert_eq!(token.bearer(), "Bearer abc");
        assert_eq!(token.secret(), "abc");
    }
}
