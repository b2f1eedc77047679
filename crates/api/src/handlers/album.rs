//! Handlers for tracks grouped in an album.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reel2bits_core::types::DbId;
use reel2bits_db::repositories::TrackRepo;

use crate::error::AppResult;
use crate::query::AlbumTrackParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/albums/{id}/tracks?only_public=
pub async fn list_tracks(
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
    Query(params): Query<AlbumTrackParams>,
) -> AppResult<impl IntoResponse> {
    let tracks = TrackRepo::list_album_tracks(&state.pool, album_id, params.only_public).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// GET /api/v1/albums/{id}/tracks/first?only_public=
pub async fn first_track(
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
    Query(params): Query<AlbumTrackParams>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::first_of_album(&state.pool, album_id, params.only_public).await?;
    Ok(Json(DataResponse { data: track }))
}

/// GET /api/v1/albums/{id}/tracks/{order}
pub async fn track_at(
    State(state): State<AppState>,
    Path((album_id, order)): Path<(DbId, i64)>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::find_by_album_and_order(&state.pool, album_id, order).await?;
    Ok(Json(DataResponse { data: track }))
}
