//! Route definitions for tracks across users.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET  /             -> list (public, all users)
/// GET  /not-ready    -> list_not_ready
/// GET  /{id}         -> get
/// PUT  /{id}         -> update
/// PUT  /{id}/ready   -> set_ready
/// PUT  /{id}/state   -> update_state
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list))
        .route("/not-ready", get(track::list_not_ready))
        .route("/{id}", get(track::get).put(track::update))
        .route("/{id}/ready", put(track::set_ready))
        .route("/{id}/state", put(track::update_state))
}
