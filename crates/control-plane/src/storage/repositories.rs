// Repository layer for PostgreSQL
// Decision: Social-login upsert is one INSERT ... ON CONFLICT statement so
// concurrent first logins for the same identity cannot create duplicates

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;

const PROFILE_COLUMNS: &str = "id, provider, external_id, email, name, channel_name, bio, \
    language, web_address, location, profile_picture, verified, device_ids, fcm_token, \
    area_of_expert, followers, following, rooms_created, live, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        Ok(Self { pool })
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    /// Underlying pool, for statements outside this repository
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Profiles
    // ============================================

    pub async fn upsert_social_profile(&self, input: UpsertSocialProfile) -> Result<ProfileRow> {
        let query = format!(
            r#"
            INSERT INTO profiles (id, provider, external_id, email, name, channel_name, profile_picture, device_ids, fcm_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    CASE WHEN $8::text IS NULL THEN '{{}}'::text[] ELSE ARRAY[$8::text] END,
                    $9)
            ON CONFLICT (provider, external_id) DO UPDATE SET
                fcm_token = EXCLUDED.fcm_token,
                device_ids = CASE
                    WHEN $8::text IS NULL OR $8::text = ANY(profiles.device_ids) THEN profiles.device_ids
                    ELSE array_append(profiles.device_ids, $8::text)
                END,
                updated_at = now()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let row = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.provider)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.channel_name)
            .bind(&input.profile_picture)
            .bind(&input.device_id)
            .bind(&input.fcm_token)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Option<ProfileRow>> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let row = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    // ============================================
    // Rooms
    // ============================================

    pub async fn list_rooms_by_creator(
        &self,
        creator_id: Uuid,
        filter: RoomFilter,
    ) -> Result<Vec<RoomRow>> {
        let (live_only, scheduled_after) = match filter {
            RoomFilter::All => (false, None),
            RoomFilter::Live => (true, None),
            RoomFilter::ScheduledAfter(after_ms) => (false, Some(after_ms)),
        };

        let rows = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT id, creator_id, title, live, schedule, created_at
            FROM rooms
            WHERE creator_id = $1
              AND ($2 = FALSE OR live)
              AND ($3::bigint IS NULL OR schedule > $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator_id)
        .bind(live_only)
        .bind(scheduled_after)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Videos
    // ============================================

    pub async fn list_videos_by_profile(&self, profile_id: Uuid) -> Result<Vec<VideoRow>> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, profile_id, title, url, created_at
            FROM videos
            WHERE profile_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
