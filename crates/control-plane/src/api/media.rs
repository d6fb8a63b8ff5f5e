// Profile media routes
// Decision: Rooms and videos are written by other services; listing them
// requires the owning profile to exist (404 otherwise)

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{ApiError, ApiResponse, ErrorResponse};
use super::profiles::{load_profile, ProfileQuery};
use crate::auth::OptionalAuthUser;
use crate::storage::{RoomFilter, RoomRow, VideoRow};
use crate::AppState;

/// Audio room created by a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomView {
    #[serde(rename = "_id")]
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub live: bool,
    /// Scheduled start in epoch milliseconds, 0 when unscheduled
    pub schedule: i64,
}

impl From<RoomRow> for RoomView {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id.to_string(),
            creator_id: row.creator_id.to_string(),
            title: row.title,
            live: row.live,
            schedule: row.schedule,
        }
    }
}

/// Video uploaded by a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoView {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaResponse {
    pub videos: Vec<VideoView>,
    pub rooms: Vec<RoomView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomsResponse {
    pub rooms: Vec<RoomView>,
}

/// Create media routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/profile/media", get(get_media))
        .route("/profile/media/live", get(get_live_rooms))
        .route("/profile/media/upcoming", get(get_upcoming_rooms))
        .with_state(state)
}

/// GET /profile/media - Videos and rooms of a profile
#[utoipa::path(
    get,
    path = "/profile/media",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Media Extracted for the profile", body = ApiResponse<MediaResponse>),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "media"
)]
pub async fn get_media(
    State(state): State<AppState>,
    _viewer: OptionalAuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<MediaResponse>>, ApiError> {
    let profile = load_profile(&state, query.profile_id()?).await?;

    let message = format!("Media Extracted for {}", profile.id);
    let videos = state.db.list_videos_by_profile(profile.id).await?;
    let rooms = state
        .db
        .list_rooms_by_creator(profile.id, RoomFilter::All)
        .await?;

    Ok(Json(ApiResponse::ok(
        MediaResponse {
            videos: videos.into_iter().map(VideoView::from).collect(),
            rooms: rooms.into_iter().map(RoomView::from).collect(),
        },
        message,
    )))
}

/// GET /profile/media/live - Rooms of a profile that are live now
#[utoipa::path(
    get,
    path = "/profile/media/live",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Live rooms of the profile", body = ApiResponse<RoomsResponse>),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "media"
)]
pub async fn get_live_rooms(
    State(state): State<AppState>,
    _viewer: OptionalAuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<RoomsResponse>>, ApiError> {
    list_rooms(&state, &query, RoomFilter::Live, "Live Rooms").await
}

/// GET /profile/media/upcoming - Rooms of a profile scheduled in the future
#[utoipa::path(
    get,
    path = "/profile/media/upcoming",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Upcoming rooms of the profile", body = ApiResponse<RoomsResponse>),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "media"
)]
pub async fn get_upcoming_rooms(
    State(state): State<AppState>,
    _viewer: OptionalAuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<RoomsResponse>>, ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    list_rooms(
        &state,
        &query,
        RoomFilter::ScheduledAfter(now_ms),
        "Upcoming Rooms",
    )
    .await
}

async fn list_rooms(
    state: &AppState,
    query: &ProfileQuery,
    filter: RoomFilter,
    label: &str,
) -> Result<Json<ApiResponse<RoomsResponse>>, ApiError> {
    let profile = load_profile(state, query.profile_id()?).await?;
    let rooms = state.db.list_rooms_by_creator(profile.id, filter).await?;

    Ok(Json(ApiResponse::ok(
        RoomsResponse {
            rooms: rooms.into_iter().map(RoomView::from).collect(),
        },
        format!("{} of the User having ID {}", label, profile.id),
    )))
}
