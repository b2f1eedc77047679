//! Route definitions for album track lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::album;
use crate::state::AppState;

/// Routes mounted at `/albums`.
///
/// ```text
/// GET /{id}/tracks          -> list_tracks
/// GET /{id}/tracks/first    -> first_track
/// GET /{id}/tracks/{order}  -> track_at
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/tracks", get(album::list_tracks))
        .route("/{id}/tracks/first", get(album::first_track))
        .route("/{id}/tracks/{order}", get(album::track_at))
}
