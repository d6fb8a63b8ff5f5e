// Error types for the authentication core

use thiserror::Error;

/// Result type alias for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while issuing, verifying or redeeming tokens and while
/// resolving third-party identities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Required configuration (signing secret, provider client id) is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input has the wrong shape (empty user id, empty subject, empty body field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Token could not be parsed
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Token signature does not match
    #[error("Invalid token signature")]
    Signature,

    /// Token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Token kind differs from the kind the operation expects
    #[error("Expected {expected} token, got {actual}")]
    KindMismatch {
        expected: crate::token::TokenKind,
        actual: crate::token::TokenKind,
    },

    /// Third-party identity verification failed
    #[error("{provider} authentication failed: {reason}")]
    ProviderAuth { provider: String, reason: String },
}

impl AuthError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AuthError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    /// Create a malformed-token error
    pub fn malformed(msg: impl Into<String>) -> Self {
        AuthError::Malformed(msg.into())
    }

    /// Create a provider authentication error
    pub fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        AuthError::ProviderAuth {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}
