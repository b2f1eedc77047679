//! Timeline (activity feed) item model and DTOs.

use reel2bits_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `timeline_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineItem {
    pub id: DbId,
    pub user_id: DbId,
    pub track_id: Option<DbId>,
    pub album_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a timeline item. At least one of `track_id` / `album_id`
/// must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimelineItem {
    pub user_id: DbId,
    pub track_id: Option<DbId>,
    pub album_id: Option<DbId>,
}
