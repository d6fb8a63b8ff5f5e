// Database row types and inputs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub provider: String,
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub channel_name: String,
    pub bio: String,
    pub language: String,
    pub web_address: String,
    pub location: String,
    pub profile_picture: String,
    pub verified: bool,
    pub device_ids: Vec<String>,
    pub fcm_token: Option<String>,
    pub area_of_expert: Vec<String>,
    /// Internal IDs of profiles following this one
    pub followers: Vec<String>,
    /// Internal IDs of profiles this one follows
    pub following: Vec<String>,
    pub rooms_created: i32,
    pub live: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn is_followed_by(&self, viewer_id: &str) -> bool {
        self.followers.iter().any(|f| f == viewer_id)
    }
}

/// Input for social-login find-or-create
#[derive(Debug, Clone)]
pub struct UpsertSocialProfile {
    pub provider: String,
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub profile_picture: String,
    /// Only used when the profile is created
    pub channel_name: String,
    pub device_id: Option<String>,
    pub fcm_token: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RoomRow {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub live: bool,
    /// Epoch milliseconds, 0 when unscheduled
    pub schedule: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRoomRow {
    pub creator_id: Uuid,
    pub title: String,
    pub live: bool,
    pub schedule: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateVideoRow {
    pub profile_id: Uuid,
    pub title: String,
    pub url: String,
}

/// Which of a creator's rooms to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFilter {
    All,
    Live,
    /// Rooms scheduled strictly after the given epoch milliseconds
    ScheduledAfter(i64),
}

impl RoomFilter {
    pub fn matches(&self, room: &RoomRow) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::Live => room.live,
            RoomFilter::ScheduledAfter(after_ms) => room.schedule > *after_ms,
        }
    }
}
