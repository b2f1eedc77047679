//! Handlers for the `/tracks` resource.
//!
//! Cross-user listings plus the endpoints the processing worker drives
//! (backlog, state updates, readiness).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reel2bits_core::types::DbId;
use reel2bits_db::models::track::{TrackListOptions, UpdateTrack, UpdateTrackState};
use reel2bits_db::repositories::TrackRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::TrackListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /tracks/{id}/ready`.
#[derive(Debug, Deserialize)]
pub struct SetReadyRequest {
    pub ready: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks?page=&page_size=&only_ready=
///
/// Public tracks of every user, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TrackListParams>,
) -> AppResult<impl IntoResponse> {
    let opts = TrackListOptions {
        get_all: true,
        page: params.page,
        page_size: params.page_size,
        only_ready: params.only_ready,
        ..Default::default()
    };
    let page = TrackRepo::list(&state.pool, &opts).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/tracks/not-ready
pub async fn list_not_ready(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tracks = TrackRepo::list_not_ready(&state.pool).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// GET /api/v1/tracks/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: track }))
}

/// PUT /api/v1/tracks/{id}
///
/// Partial update; a new title re-derives the slug.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: track }))
}

/// PUT /api/v1/tracks/{id}/ready
pub async fn set_ready(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetReadyRequest>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::set_ready(&state.pool, id, input.ready).await?;
    tracing::info!(track_id = id, ready = input.ready, "Track readiness changed");
    Ok(Json(DataResponse { data: track }))
}

/// PUT /api/v1/tracks/{id}/state
///
/// Invalid transitions answer 409 and leave the track unchanged.
pub async fn update_state(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrackState>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::update_state(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: track }))
}
