//! Derived audio metadata filled in by the processing worker.

use reel2bits_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `track_infos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackInfo {
    pub id: DbId,
    pub duration_secs: Option<f64>,
    pub bitrate: Option<i32>,
    pub bitrate_mode: Option<String>,
    pub channels: Option<i32>,
    pub codec: Option<String>,
    pub format: Option<String>,
    pub rate: Option<i32>,
    pub waveform: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating track info. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTrackInfo {
    pub duration_secs: Option<f64>,
    pub bitrate: Option<i32>,
    pub bitrate_mode: Option<String>,
    pub channels: Option<i32>,
    pub codec: Option<String>,
    pub format: Option<String>,
    pub rate: Option<i32>,
    pub waveform: Option<serde_json::Value>,
}
