//! Repository for the `track_infos` table.

use reel2bits_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::track_info::{CreateTrackInfo, TrackInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, duration_secs, bitrate, bitrate_mode, channels, codec, format, \
    rate, waveform, created_at, updated_at";

/// Provides CRUD operations for track infos.
pub struct TrackInfoRepo;

impl TrackInfoRepo {
    /// Insert a new track info, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTrackInfo) -> Result<TrackInfo, sqlx::Error> {
        insert(pool, input).await
    }

    /// Insert a track info and link it to `track_id` in one transaction.
    ///
    /// Returns `None` (and inserts nothing) if the track does not exist.
    pub async fn create_for_track(
        pool: &PgPool,
        track_id: DbId,
        input: &CreateTrackInfo,
    ) -> Result<Option<TrackInfo>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let info = insert(&mut *tx, input).await?;

        let linked = sqlx::query("UPDATE tracks SET track_info_id = $2 WHERE id = $1")
            .bind(track_id)
            .bind(info.id)
            .execute(&mut *tx)
            .await?;

        if linked.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(info))
    }

    /// Find a track info by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrackInfo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM track_infos WHERE id = $1");
        sqlx::query_as::<_, TrackInfo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Point `track_id` at an existing info row. Returns `true` if the track existed.
    pub async fn attach_to_track(
        pool: &PgPool,
        track_id: DbId,
        info_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tracks SET track_info_id = $2 WHERE id = $1")
            .bind(track_id)
            .bind(info_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a track info by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM track_infos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert<'e, E>(executor: E, input: &CreateTrackInfo) -> Result<TrackInfo, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "INSERT INTO track_infos
            (duration_secs, bitrate, bitrate_mode, channels, codec, format, rate, waveform)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, TrackInfo>(&query)
        .bind(input.duration_secs)
        .bind(input.bitrate)
        .bind(&input.bitrate_mode)
        .bind(input.channels)
        .bind(&input.codec)
        .bind(&input.format)
        .bind(input.rate)
        .bind(&input.waveform)
        .fetch_one(executor)
        .await
}
