//! Repository for the `timeline_items` table.

use reel2bits_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::timeline_item::{CreateTimelineItem, TimelineItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, track_id, album_id, created_at";

/// Provides feed item operations.
pub struct TimelineItemRepo;

impl TimelineItemRepo {
    /// Insert a new timeline item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTimelineItem,
    ) -> Result<TimelineItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO timeline_items (user_id, track_id, album_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimelineItem>(&query)
            .bind(input.user_id)
            .bind(input.track_id)
            .bind(input.album_id)
            .fetch_one(pool)
            .await
    }

    /// List a user's timeline, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TimelineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timeline_items \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TimelineItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete the items of `user_id` referencing the given track and/or album.
    /// A `None` key matches any value.
    ///
    /// Fails with [`DbError::TimelineItemNotFound`] if nothing matched.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        track_id: Option<DbId>,
        album_id: Option<DbId>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "DELETE FROM timeline_items \
             WHERE user_id = $1 \
               AND ($2::BIGINT IS NULL OR track_id = $2) \
               AND ($3::BIGINT IS NULL OR album_id = $3)",
        )
        .bind(user_id)
        .bind(track_id)
        .bind(album_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TimelineItemNotFound {
                user_id,
                track_id,
                album_id,
            });
        }
        Ok(result.rows_affected())
    }
}
