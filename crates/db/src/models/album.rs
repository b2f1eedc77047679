//! Album entity model and DTOs.

use reel2bits_core::fake_bool::{FakeBool, FlagValue};
use reel2bits_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `albums` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub private: FlagValue,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Album {
    pub fn is_private(&self) -> bool {
        FakeBool::decode(self.private, false)
    }
}

/// DTO for creating a new album.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlbum {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to public if omitted.
    pub private: Option<bool>,
}
