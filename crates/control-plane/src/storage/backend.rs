// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL and apply migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    // ============================================
    // Profiles
    // ============================================

    pub async fn upsert_social_profile(&self, input: UpsertSocialProfile) -> Result<ProfileRow> {
        match self {
            Self::Postgres(db) => db.upsert_social_profile(input).await,
            Self::InMemory(db) => db.upsert_social_profile(input).await,
        }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Option<ProfileRow>> {
        match self {
            Self::Postgres(db) => db.get_profile(id).await,
            Self::InMemory(db) => db.get_profile(id).await,
        }
    }

    // ============================================
    // Media
    // ============================================

    pub async fn list_rooms_by_creator(
        &self,
        creator_id: Uuid,
        filter: RoomFilter,
    ) -> Result<Vec<RoomRow>> {
        match self {
            Self::Postgres(db) => db.list_rooms_by_creator(creator_id, filter).await,
            Self::InMemory(db) => db.list_rooms_by_creator(creator_id, filter).await,
        }
    }

    pub async fn list_videos_by_profile(&self, profile_id: Uuid) -> Result<Vec<VideoRow>> {
        match self {
            Self::Postgres(db) => db.list_videos_by_profile(profile_id).await,
            Self::InMemory(db) => db.list_videos_by_profile(profile_id).await,
        }
    }
}
