// Authentication extractors
// Decision: Bearer header only; the server issues no cookies
// Decision: Strict and optional modes share one verification path so they
// cannot drift apart

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use profiles_core::{AuthError, TokenKind, TokenService};

use crate::api::common::ApiError;

/// Authenticated caller, attached by [`AuthUser`] extraction.
/// Extraction rejects with 401 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Verified token subject (internal profile id)
    pub user_id: String,
}

/// Caller identity when one was presented and verified.
/// Never rejects; a bad or missing token means an anonymous request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.user_id.as_str())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        authenticate(parts, &tokens).map_err(|e| {
            tracing::debug!(error = %e, path = %parts.uri.path(), "Rejected request");
            ApiError::from_token_error(e)
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        match authenticate(parts, &tokens) {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(e) => {
                if parts.headers.contains_key(header::AUTHORIZATION) {
                    tracing::debug!(error = %e, "Ignoring invalid bearer token");
                }
                Ok(OptionalAuthUser(None))
            }
        }
    }
}

/// Verify the bearer access token carried by the request
fn authenticate(parts: &Parts, tokens: &TokenService) -> Result<AuthUser, AuthError> {
    let token = bearer_token(parts)?;
    let claims = tokens.verify(token, TokenKind::Access)?;
    Ok(AuthUser {
        user_id: claims.sub,
    })
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuthError::validation("missing authorization header"))?
        .to_str()
        .map_err(|_| AuthError::malformed("authorization header is not ASCII"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::malformed("expected Bearer scheme"))
}
