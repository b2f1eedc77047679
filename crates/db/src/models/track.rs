//! Track entity model and DTOs.
//!
//! Flags (`ready`, `private`, ...) are stored as encoded SMALLINTs, see
//! [`reel2bits_core::fake_bool`]. Processing states are stored as
//! [`ProcessingState`] ids. Use the accessor methods rather than the raw
//! columns.

use reel2bits_core::fake_bool::{FakeBool, FlagValue};
use reel2bits_core::licence::{licence_by_id, Licence};
use reel2bits_core::pagination::{clamp_page, clamp_page_size};
use reel2bits_core::processing::{ProcessingState, StateId, TrackStateKind};
use reel2bits_core::storage::RemovalReport;
use reel2bits_core::types::{timestamp_from_unix, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::track_info::TrackInfo;
use crate::models::user::User;

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub hash: String,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub licence: i32,
    /// Name on disk, derived from `hash`, with extension.
    pub filename: String,
    /// Uploaded name without extension.
    pub filename_orig: String,
    pub mimetype: String,
    pub album_id: Option<DbId>,
    pub album_order: i64,
    pub transcode_needed: FlagValue,
    pub transcode_state: StateId,
    pub metadatas_state: StateId,
    pub transcode_start_unix: i64,
    pub transcode_stop_unix: i64,
    pub processing_error: Option<String>,
    pub track_info_id: Option<DbId>,
    pub ready: FlagValue,
    pub private: FlagValue,
    pub show_dl_link: FlagValue,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Track {
    pub fn is_transcode_needed(&self) -> bool {
        FakeBool::decode(self.transcode_needed, false)
    }

    pub fn is_ready(&self) -> bool {
        FakeBool::decode(self.ready, false)
    }

    pub fn is_private(&self) -> bool {
        FakeBool::decode(self.private, false)
    }

    pub fn can_show_dl_link(&self) -> bool {
        FakeBool::decode(self.show_dl_link, true)
    }

    /// Parsed transcode state, `None` if the stored id is unknown.
    pub fn transcode_state(&self) -> Option<ProcessingState> {
        ProcessingState::try_from_id(self.transcode_state).ok()
    }

    /// Parsed metadata state, `None` if the stored id is unknown.
    pub fn metadatas_state(&self) -> Option<ProcessingState> {
        ProcessingState::try_from_id(self.metadatas_state).ok()
    }

    /// State column targeted by `kind`.
    pub fn state_id(&self, kind: TrackStateKind) -> StateId {
        match kind {
            TrackStateKind::Transcoding => self.transcode_state,
            TrackStateKind::Metadatas => self.metadatas_state,
        }
    }

    /// False only when transcoding failed; a waiting track is still "on its way".
    pub fn processing_done(&self) -> bool {
        self.transcode_state != ProcessingState::Failed.id()
    }

    /// Whether a transcode file may exist on disk.
    pub fn has_transcode(&self) -> bool {
        self.transcode_state != ProcessingState::NotNeeded.id()
    }

    pub fn licence(&self) -> Option<&'static Licence> {
        licence_by_id(self.licence)
    }

    pub fn transcode_start(&self) -> Option<Timestamp> {
        timestamp_from_unix(self.transcode_start_unix)
    }

    pub fn transcode_stop(&self) -> Option<Timestamp> {
        timestamp_from_unix(self.transcode_stop_unix)
    }
}

/// DTO for creating a new track after its file has been stored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrack {
    pub hash: String,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to 0 (not specified).
    pub licence: Option<i32>,
    pub filename: String,
    pub filename_orig: String,
    pub mimetype: String,
    pub album_id: Option<DbId>,
    pub album_order: Option<i64>,
    /// Selects the initial transcode state.
    pub transcode_needed: bool,
    /// Defaults to public if omitted.
    pub private: Option<bool>,
    /// Defaults to shown if omitted.
    pub show_dl_link: Option<bool>,
}

/// DTO for editing a track. All fields optional; a new title re-derives the slug.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub description: Option<String>,
    pub licence: Option<i32>,
    pub album_id: Option<DbId>,
    pub album_order: Option<i64>,
    pub private: Option<bool>,
    pub show_dl_link: Option<bool>,
    /// Take the track out of its album: `album_id` becomes null and
    /// `album_order` resets to 0. Wins over `album_id`/`album_order`.
    #[serde(default)]
    pub remove_from_album: bool,
}

/// DTO written by the processing worker.
///
/// `kind` selects the state column; the timestamps only apply to
/// transcoding. `None` keeps the stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTrackState {
    pub kind: TrackStateKind,
    pub state: StateId,
    pub transcode_start: Option<Timestamp>,
    pub transcode_stop: Option<Timestamp>,
    pub processing_error: Option<String>,
}

/// Filters and paging for [`TrackRepo::list`](crate::repositories::TrackRepo::list).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackListOptions {
    /// Owner to restrict to when `get_all` is false.
    #[serde(default)]
    pub user_id: DbId,
    /// Include private tracks. Only honoured for single-user listings.
    #[serde(default)]
    pub with_private: bool,
    /// List every user's tracks instead of one user's.
    #[serde(default)]
    pub get_all: bool,
    /// 1-based; values below 1 are treated as 1.
    #[serde(default)]
    pub page: i64,
    /// Clamped to `1..=MAX_PAGE_SIZE`; non-positive means default.
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub only_ready: bool,
}

impl TrackListOptions {
    pub fn page(&self) -> i64 {
        clamp_page(self.page)
    }

    pub fn page_size(&self) -> i64 {
        clamp_page_size(self.page_size)
    }

    /// Private rows are only visible when a single owner lists their own tracks.
    pub fn includes_private(&self) -> bool {
        self.with_private && !self.get_all
    }

    /// Owner filter, `None` when listing across users.
    pub fn owner_filter(&self) -> Option<DbId> {
        (!self.get_all).then_some(self.user_id)
    }
}

/// One page of tracks plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// A track with its owner and (optional) derived metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TrackWithInfo {
    pub track: Track,
    pub info: Option<TrackInfo>,
    pub user: User,
}

/// What [`TrackRepo::delete`](crate::repositories::TrackRepo::delete) did
/// beyond removing the track row.
#[derive(Debug, Clone, Serialize)]
pub struct TrackDeletion {
    pub track_id: DbId,
    pub info_deleted: bool,
    pub timeline_item_deleted: bool,
    pub files: RemovalReport,
}
