// Token configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config, JWT_SECRET accepted as a fallback
// Decision: Short-lived access tokens (15 min), long-lived refresh tokens (30 days)

use std::time::Duration;

use crate::error::{AuthError, Result};

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime
pub const DEFAULT_REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Signing and lifetime configuration for issued tokens
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens (HS256). Empty means unset.
    pub secret: String,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_lifetime: DEFAULT_ACCESS_TOKEN_LIFETIME,
            refresh_token_lifetime: DEFAULT_REFRESH_TOKEN_LIFETIME,
        }
    }
}

impl TokenConfig {
    /// Load configuration from environment variables
    ///
    /// - `AUTH_JWT_SECRET` (or `JWT_SECRET`): signing secret
    /// - `AUTH_JWT_ACCESS_TOKEN_LIFETIME`: seconds
    /// - `AUTH_JWT_REFRESH_TOKEN_LIFETIME`: seconds
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .or_else(|_| std::env::var("JWT_SECRET"))
            .unwrap_or_default();

        let access_token_lifetime = duration_from_env("AUTH_JWT_ACCESS_TOKEN_LIFETIME")
            .unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME);

        let refresh_token_lifetime = duration_from_env("AUTH_JWT_REFRESH_TOKEN_LIFETIME")
            .unwrap_or(DEFAULT_REFRESH_TOKEN_LIFETIME);

        Self {
            secret,
            access_token_lifetime,
            refresh_token_lifetime,
        }
    }

    /// Check the configuration is usable for signing
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_empty() {
            return Err(AuthError::config("AUTH_JWT_SECRET not set"));
        }
        if self.access_token_lifetime.is_zero() || self.refresh_token_lifetime.is_zero() {
            return Err(AuthError::config("token lifetimes must be non-zero"));
        }
        if self.access_token_lifetime >= self.refresh_token_lifetime {
            tracing::warn!(
                access_secs = self.access_token_lifetime.as_secs(),
                refresh_secs = self.refresh_token_lifetime.as_secs(),
                "Access token lifetime is not shorter than refresh token lifetime"
            );
        }
        Ok(())
    }
}

fn duration_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert!(config.secret.is_empty());
        assert_eq!(config.access_token_lifetime, Duration::from_secs(900));
        assert_eq!(config.refresh_token_lifetime, Duration::from_secs(2_592_000));
        assert!(config.access_token_lifetime < config.refresh_token_lifetime);
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = TokenConfig::default();
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));

        let config = TokenConfig {
            secret: "s3cret".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_lifetime() {
        let config = TokenConfig {
            secret: "s3cret".to_string(),
            access_token_lifetime: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }
}
