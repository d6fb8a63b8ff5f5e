// Authentication HTTP routes
// Decision: Login is social-only; the provider token is exchanged for our own pair
// Decision: /auth/refresh is public, possession of the refresh token is enough

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use profiles_core::{AuthError, TokenPair};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::{ExternalIdentity, SocialProvider};
use crate::api::common::{ApiError, ErrorResponse};
use crate::api::profiles::ProfileView;
use crate::storage::UpsertSocialProfile;
use crate::AppState;

/// Social login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SocialLoginRequest {
    /// Google ID token or Facebook access token
    pub auth_token: String,
    /// Device to remember for push notifications
    #[serde(default)]
    pub device_id: Option<String>,
    /// Firebase Cloud Messaging token; replaces the stored one
    #[serde(default)]
    pub fcm_token: Option<String>,
}

/// Successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: ProfileView,
}

/// Refresh token request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Freshly minted access token
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/google", post(google_login))
        .route("/auth/facebook", post(facebook_login))
        .route("/auth/refresh", post(refresh_token))
        .with_state(state)
}

/// POST /auth/google - Sign in with a Google ID token
#[utoipa::path(
    post,
    path = "/auth/google",
    request_body = SocialLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing auth_token or invalid body", body = ErrorResponse),
        (status = 401, description = "Google rejected the token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_login(
    State(state): State<AppState>,
    payload: Result<Json<SocialLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    social_login(&state, SocialProvider::Google, payload).await
}

/// POST /auth/facebook - Sign in with a Facebook access token
#[utoipa::path(
    post,
    path = "/auth/facebook",
    request_body = SocialLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing auth_token or invalid body", body = ErrorResponse),
        (status = 401, description = "Facebook rejected the token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn facebook_login(
    State(state): State<AppState>,
    payload: Result<Json<SocialLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    social_login(&state, SocialProvider::Facebook, payload).await
}

async fn social_login(
    state: &AppState,
    provider: SocialProvider,
    payload: Result<Json<SocialLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if req.auth_token.trim().is_empty() {
        return Err(AuthError::validation("auth_token is required").into());
    }

    let identity = state
        .identity
        .resolve(provider, &req.auth_token)
        .await
        .map_err(|e| ApiError::from_provider_error(provider, e))?;

    let profile = state
        .db
        .upsert_social_profile(upsert_input(provider, identity, req.device_id, req.fcm_token))
        .await?;

    let TokenPair {
        access_token,
        refresh_token,
        token_type,
        expires_in,
    } = state.tokens.issue_pair(&profile.id.to_string())?;

    tracing::info!(
        provider = provider.as_str(),
        profile_id = %profile.id,
        "Social login"
    );

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token,
        refresh_token,
        token_type,
        expires_in,
        user: ProfileView::from(&profile),
    }))
}

/// POST /auth/refresh - Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshTokenResponse),
        (status = 400, description = "Missing refresh_token or invalid body", body = ErrorResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if req.refresh_token.trim().is_empty() {
        return Err(ApiError::bad_request("refresh_token is required"));
    }

    let access_token = state.tokens.redeem(&req.refresh_token).map_err(|e| {
        tracing::debug!(error = %e, "Refresh token rejected");
        ApiError::from_token_error(e)
    })?;

    Ok(Json(RefreshTokenResponse { access_token }))
}

fn upsert_input(
    provider: SocialProvider,
    identity: ExternalIdentity,
    device_id: Option<String>,
    fcm_token: Option<String>,
) -> UpsertSocialProfile {
    UpsertSocialProfile {
        provider: provider.as_str().to_string(),
        channel_name: generate_channel_name(&identity.display_name),
        external_id: identity.external_id,
        email: identity.email,
        name: identity.display_name,
        profile_picture: identity.avatar_url,
        device_id: device_id.filter(|d| !d.is_empty()),
        fcm_token: fcm_token.filter(|t| !t.is_empty()),
    }
}

/// Channel handle for a new profile: lower-cased name without whitespace
/// plus a three-digit suffix
fn generate_channel_name(display_name: &str) -> String {
    let mut base: String = display_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if base.is_empty() {
        base.push_str("user");
    }

    let suffix: u16 = rand::thread_rng().gen_range(100..1000);
    format!("{}{}", base, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_channel_name() {
        let name = generate_channel_name("Ada Lovelace");
        assert!(name.starts_with("adalovelace"), "{}", name);
        let suffix = &name["adalovelace".len()..];
        assert_eq!(suffix.len(), 3);
        assert!(suffix.parse::<u16>().is_ok());
    }

    #[test]
    fn test_generate_channel_name_without_display_name() {
        let name = generate_channel_name("  ");
        assert!(name.starts_with("user"));
        assert_eq!(name.len(), "user".len() + 3);
    }

    #[test]
    fn test_upsert_input_drops_empty_device_fields() {
        let input = upsert_input(
            SocialProvider::Facebook,
            ExternalIdentity {
                external_id: "fb-1".to_string(),
                email: "a@example.com".to_string(),
                display_name: "A".to_string(),
                avatar_url: String::new(),
            },
            Some(String::new()),
            Some("fcm".to_string()),
        );
        assert_eq!(input.provider, "facebook");
        assert_eq!(input.device_id, None);
        assert_eq!(input.fcm_token.as_deref(), Some("fcm"));
    }
}
