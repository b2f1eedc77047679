pub mod album;
pub mod health;
pub mod track;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tracks                              public listing
/// /tracks/not-ready                    processing backlog
/// /tracks/{id}                         get, update
/// /tracks/{id}/ready                   set readiness
/// /tracks/{id}/state                   processing state
///
/// /users/{user_id}/tracks              owner listing, upload
/// /users/{user_id}/tracks/{slug}       get by slug
/// /users/{user_id}/tracks/{id}         delete
/// /users/{user_id}/storage/reconcile   purge orphaned files
///
/// /albums/{id}/tracks                  album tracks
/// /albums/{id}/tracks/first            first album track
/// /albums/{id}/tracks/{order}          album track by position
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tracks", track::router())
        .nest("/users", user::router())
        .nest("/albums", album::router())
}
