// Profile API routes
// Decision: Profiles are created only by social login; these routes are read-only
// Decision: is_following is present only when the caller is identified

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{ApiError, ApiResponse, ErrorResponse};
use crate::auth::{AuthUser, OptionalAuthUser};
use crate::storage::ProfileRow;
use crate::AppState;

/// Public view of a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub bio: String,
    pub web_address: String,
    pub channel_name: String,
    pub area_of_expert: Vec<String>,
    pub profile_picture: String,
    pub verified: bool,
    pub location: String,
    /// Identity provider the profile signed up with
    #[schema(example = "google")]
    pub provider: String,
    pub follower_count: usize,
    pub following_count: usize,
    /// Whether the caller follows this profile (identified callers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl From<&ProfileRow> for ProfileView {
    fn from(row: &ProfileRow) -> Self {
        Self {
            id: row.id.to_string(),
            email: row.email.clone(),
            name: row.name.clone(),
            bio: row.bio.clone(),
            web_address: row.web_address.clone(),
            channel_name: row.channel_name.clone(),
            area_of_expert: row.area_of_expert.clone(),
            profile_picture: row.profile_picture.clone(),
            verified: row.verified,
            location: row.location.clone(),
            provider: row.provider.clone(),
            follower_count: row.followers.len(),
            following_count: row.following.len(),
            is_following: None,
        }
    }
}

/// Minimal profile identity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&ProfileRow> for ProfileSummary {
    fn from(row: &ProfileRow) -> Self {
        Self {
            id: row.id.to_string(),
            email: row.email.clone(),
            name: row.name.clone(),
        }
    }
}

/// Query selecting a profile by id
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    /// Profile id
    pub id: Option<String>,
}

impl ProfileQuery {
    pub fn profile_id(&self) -> Result<Uuid, ApiError> {
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request("id is required"))?;
        Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid profile id"))
    }
}

/// Load a profile or fail with 404
pub(crate) async fn load_profile(state: &AppState, id: Uuid) -> Result<ProfileRow, ApiError> {
    state
        .db
        .get_profile(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Create profile routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(get_own_profile))
        .route("/public", get(get_public_profile))
        .route("/profile/media2", get(get_profile_summary))
        .with_state(state)
}

/// GET /profile - Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile Data Extracted", body = ApiResponse<ProfileView>),
        (status = 400, description = "Token subject is not a profile id", body = ErrorResponse),
        (status = 401, description = "Invalid or missing token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn get_own_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let id = Uuid::parse_str(&user.user_id)
        .map_err(|_| ApiError::bad_request("Invalid user id in token"))?;
    let profile = load_profile(&state, id).await?;

    Ok(Json(ApiResponse::ok(
        ProfileView::from(&profile),
        "Profile Data Extracted",
    )))
}

/// GET /public - Public profile, personalized when the caller is identified
#[utoipa::path(
    get,
    path = "/public",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Data Extracted", body = ApiResponse<ProfileView>),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let profile = load_profile(&state, query.profile_id()?).await?;

    let mut view = ProfileView::from(&profile);
    view.is_following = viewer.user_id().map(|id| profile.is_followed_by(id));

    Ok(Json(ApiResponse::ok(view, "Data Extracted")))
}

/// GET /profile/media2 - Id, email and name of a profile
#[utoipa::path(
    get,
    path = "/profile/media2",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Profile Data Extracted", body = ApiResponse<ProfileSummary>),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn get_profile_summary(
    State(state): State<AppState>,
    _viewer: OptionalAuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<ProfileSummary>>, ApiError> {
    let profile = load_profile(&state, query.profile_id()?).await?;
    Ok(Json(ApiResponse::ok(
        ProfileSummary::from(&profile),
        "Profile Data Extracted",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile_row() -> ProfileRow {
        ProfileRow {
            id: Uuid::now_v7(),
            provider: "google".to_string(),
            external_id: "1099".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            channel_name: "ada123".to_string(),
            bio: String::new(),
            language: "en".to_string(),
            web_address: String::new(),
            location: String::new(),
            profile_picture: String::new(),
            verified: false,
            device_ids: vec![],
            fcm_token: None,
            area_of_expert: vec!["math".to_string()],
            followers: vec!["a".to_string(), "b".to_string()],
            following: vec![],
            rooms_created: 0,
            live: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_view_serialization() {
        let row = profile_row();
        let json = serde_json::to_value(ProfileView::from(&row)).unwrap();

        assert_eq!(json["_id"], row.id.to_string());
        assert_eq!(json["follower_count"], 2);
        assert_eq!(json["following_count"], 0);
        assert_eq!(json["area_of_expert"][0], "math");
        assert!(json.get("is_following").is_none());
        assert!(json.get("fcm_token").is_none());
        assert!(json.get("device_ids").is_none());
    }

    #[test]
    fn test_profile_query() {
        let query = ProfileQuery { id: None };
        assert!(matches!(query.profile_id(), Err(ApiError::BadRequest(_))));

        let query = ProfileQuery {
            id: Some("not-a-uuid".to_string()),
        };
        assert!(matches!(query.profile_id(), Err(ApiError::BadRequest(_))));

        let id = Uuid::now_v7();
        let query = ProfileQuery {
            id: Some(id.to_string()),
        };
        assert_eq!(query.profile_id().unwrap(), id);
    }
}
