// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Mirrors the PostgreSQL API so the control-plane can run without a database.
// Social-login upsert runs under a single write lock, which gives the same
// find-or-create atomicity as the unique constraint in PostgreSQL.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    profiles: RwLock<HashMap<Uuid, ProfileRow>>,
    rooms: RwLock<HashMap<Uuid, RoomRow>>,
    videos: RwLock<HashMap<Uuid, VideoRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Profiles
    // ============================================

    pub async fn upsert_social_profile(&self, input: UpsertSocialProfile) -> Result<ProfileRow> {
        let now = Self::now();
        let mut profiles = self.profiles.write();

        if let Some(profile) = profiles
            .values_mut()
            .find(|p| p.provider == input.provider && p.external_id == input.external_id)
        {
            profile.fcm_token = input.fcm_token;
            if let Some(device_id) = input.device_id {
                if !profile.device_ids.contains(&device_id) {
                    profile.device_ids.push(device_id);
                }
            }
            profile.updated_at = now;
            return Ok(profile.clone());
        }

        let id = Uuid::now_v7();
        let row = ProfileRow {
            id,
            provider: input.provider,
            external_id: input.external_id,
            email: input.email,
            name: input.name,
            channel_name: input.channel_name,
            bio: String::new(),
            language: "en".to_string(),
            web_address: String::new(),
            location: String::new(),
            profile_picture: input.profile_picture,
            verified: false,
            device_ids: input.device_id.into_iter().collect(),
            fcm_token: input.fcm_token,
            area_of_expert: Vec::new(),
            followers: Vec::new(),
            following: Vec::new(),
            rooms_created: 0,
            live: false,
            created_at: now,
            updated_at: now,
        };
        profiles.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Option<ProfileRow>> {
        Ok(self.profiles.read().get(&id).cloned())
    }

    pub async fn count_profiles(&self) -> usize {
        self.profiles.read().len()
    }

    /// Record that `follower_id` follows `profile_id`
    pub async fn add_follower(&self, profile_id: Uuid, follower_id: Uuid) -> Result<()> {
        let mut profiles = self.profiles.write();
        if !profiles.contains_key(&follower_id) {
            return Err(anyhow!("Profile not found: {}", follower_id));
        }

        let profile = profiles
            .get_mut(&profile_id)
            .ok_or_else(|| anyhow!("Profile not found: {}", profile_id))?;
        let follower_key = follower_id.to_string();
        if !profile.followers.contains(&follower_key) {
            profile.followers.push(follower_key);
        }

        let profile_key = profile_id.to_string();
        if let Some(follower) = profiles.get_mut(&follower_id) {
            if !follower.following.contains(&profile_key) {
                follower.following.push(profile_key);
            }
        }
        Ok(())
    }

    // ============================================
    // Rooms
    // ============================================

    pub async fn insert_room(&self, input: CreateRoomRow) -> Result<RoomRow> {
        let id = Uuid::now_v7();
        let row = RoomRow {
            id,
            creator_id: input.creator_id,
            title: input.title,
            live: input.live,
            schedule: input.schedule,
            created_at: Self::now(),
        };
        self.rooms.write().insert(id, row.clone());

        if let Some(creator) = self.profiles.write().get_mut(&input.creator_id) {
            creator.rooms_created += 1;
        }
        Ok(row)
    }

    pub async fn list_rooms_by_creator(
        &self,
        creator_id: Uuid,
        filter: RoomFilter,
    ) -> Result<Vec<RoomRow>> {
        let mut rooms: Vec<_> = self
            .rooms
            .read()
            .values()
            .filter(|r| r.creator_id == creator_id && filter.matches(r))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rooms)
    }

    // ============================================
    // Videos
    // ============================================

    pub async fn insert_video(&self, input: CreateVideoRow) -> Result<VideoRow> {
        let id = Uuid::now_v7();
        let row = VideoRow {
            id,
            profile_id: input.profile_id,
            title: input.title,
            url: input.url,
            created_at: Self::now(),
        };
        self.videos.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn list_videos_by_profile(&self, profile_id: Uuid) -> Result<Vec<VideoRow>> {
        let mut videos: Vec<_> = self
            .videos
            .read()
            .values()
            .filter(|v| v.profile_id == profile_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(videos)
    }
}
