// Common DTOs and error handling for the public API
//
// Every profile endpoint answers with the same envelope, and every failure
// with the same error body, so clients handle one shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profiles_core::AuthError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::SocialProvider;

/// Message returned for every bearer token failure other than expiry
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or missing token";

/// Success envelope: `{data, message, status: true}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Human-readable outcome.
    #[schema(example = "Data Extracted")]
    pub message: String,
    /// Always true for successful responses.
    pub status: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            status: true,
        }
    }
}

/// Standard error response: `{status: false, message}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false for error responses.
    pub status: bool,
    /// Error message describing what went wrong.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Required server configuration is missing
    #[error("Server configuration error: {0}")]
    Config(String),

    /// Storage or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Map a failure of a presented bearer token.
    /// Only expiry is distinguished; everything else is the generic 401.
    pub fn from_token_error(err: AuthError) -> Self {
        match err {
            AuthError::Config(msg) => ApiError::Config(msg),
            AuthError::Expired => ApiError::unauthorized(AuthError::Expired.to_string()),
            _ => ApiError::unauthorized(INVALID_TOKEN_MESSAGE),
        }
    }

    /// Map a failure to resolve a `provider` login token
    pub fn from_provider_error(provider: SocialProvider, err: AuthError) -> Self {
        match err {
            AuthError::ProviderAuth { .. } => {
                ApiError::unauthorized(format!("Invalid {} token", provider.label()))
            }
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client; internal details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::NotFound(msg) => {
                msg.clone()
            }
            ApiError::Config(_) => "Server configuration error".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::ProviderAuth { .. } => ApiError::unauthorized("Invalid provider token"),
            other => ApiError::from_token_error(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(msg) => tracing::error!(error = %msg, "Server misconfigured"),
            ApiError::Internal(e) => tracing::error!(error = %e, "Request failed"),
            _ => {}
        }
        (self.status(), Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}
