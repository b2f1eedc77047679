//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the track listings (`?page=&page_size=&only_ready=`).
///
/// Paging values are clamped by the repository layer.
#[derive(Debug, Default, Deserialize)]
pub struct TrackListParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    /// Only tracks that finished processing.
    #[serde(default)]
    pub only_ready: bool,
    /// Include private tracks (owner listings only).
    #[serde(default)]
    pub with_private: bool,
}

/// Query parameters for album track lookups.
#[derive(Debug, Default, Deserialize)]
pub struct AlbumTrackParams {
    /// Restrict to ready, public tracks.
    #[serde(default)]
    pub only_public: bool,
}
