// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Only the signing secret is mandatory; a missing Google client id
// disables Google login instead of failing startup

use std::time::Duration;

use profiles_core::{AuthError, TokenConfig};

pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://oauth2.googleapis.com";
pub const DEFAULT_FACEBOOK_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Google sign-in configuration
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client id the ID token audience must match
    pub client_id: String,
    /// Base URL of the token-info verification service
    pub base_url: String,
}

/// Facebook login configuration
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    /// Base URL of the Graph API
    pub graph_url: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            graph_url: DEFAULT_FACEBOOK_GRAPH_URL.to_string(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing and lifetimes
    pub jwt: TokenConfig,
    /// Google configuration (None disables Google login)
    pub google: Option<GoogleConfig>,
    /// Facebook configuration
    pub facebook: FacebookConfig,
    /// Timeout for each identity provider request
    pub provider_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: TokenConfig::default(),
            google: None,
            facebook: FacebookConfig::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let jwt = TokenConfig::from_env();

        let google = std::env::var("AUTH_GOOGLE_CLIENT_ID")
            .ok()
            .filter(|id| !id.is_empty())
            .map(|client_id| GoogleConfig {
                client_id,
                base_url: std::env::var("AUTH_GOOGLE_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GOOGLE_BASE_URL.to_string()),
            });

        let facebook = FacebookConfig {
            graph_url: std::env::var("AUTH_FACEBOOK_GRAPH_URL")
                .unwrap_or_else(|_| DEFAULT_FACEBOOK_GRAPH_URL.to_string()),
        };

        let provider_timeout = std::env::var("AUTH_PROVIDER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT);

        Self {
            jwt,
            google,
            facebook,
            provider_timeout,
        }
    }

    /// Startup validation; only a missing signing secret is fatal
    pub fn validate(&self) -> Result<(), AuthError> {
        self.jwt.validate()?;
        if self.google.is_none() {
            tracing::warn!("AUTH_GOOGLE_CLIENT_ID not set, Google login disabled");
        }
        Ok(())
    }

    /// Check if Google login is available
    pub fn google_enabled(&self) -> bool {
        self.google.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert!(!config.google_enabled());
        assert_eq!(config.facebook.graph_url, "https://graph.facebook.com");
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = AuthConfig::default();
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));

        let config = AuthConfig {
            jwt: TokenConfig {
                secret: "s3cret".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok(), "Google is optional");
    }
}
