//! Route definitions for one user's tracks and storage.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user_track;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{user_id}/tracks             -> list
/// POST   /{user_id}/tracks             -> upload (multipart)
/// GET    /{user_id}/tracks/{slug}      -> get_by_slug
/// DELETE /{user_id}/tracks/{id}        -> delete
/// POST   /{user_id}/storage/reconcile  -> reconcile
/// ```
///
/// The slug and id routes share one path; the segment is parsed per method.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}/tracks",
            get(user_track::list).post(user_track::upload),
        )
        .route(
            "/{user_id}/tracks/{track}",
            get(user_track::get_by_slug).delete(user_track::delete),
        )
        .route("/{user_id}/storage/reconcile", post(user_track::reconcile))
}
