//! Handlers for one user's tracks: upload, owner listing, lookup by slug,
//! delete, and storage reconciliation.

use std::str::FromStr;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reel2bits_core::hashing::track_hash;
use reel2bits_core::storage::{needs_transcode, original_stem, stored_filename};
use reel2bits_core::types::DbId;
use reel2bits_db::models::timeline_item::CreateTimelineItem;
use reel2bits_db::models::track::{CreateTrack, TrackListOptions};
use reel2bits_db::models::user::User;
use reel2bits_db::reconcile::purge_orphaned_files;
use reel2bits_db::repositories::{TimelineItemRepo, TrackRepo, UserRepo};
use reel2bits_db::DbError;

use crate::error::{AppError, AppResult};
use crate::query::TrackListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fields accepted by the upload form besides `file`.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    title: Option<String>,
    description: Option<String>,
    licence: Option<i32>,
    album_id: Option<DbId>,
    album_order: Option<i64>,
    private: Option<bool>,
    show_dl_link: Option<bool>,
}

async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Db(DbError::UserNotFound(user_id)))
}

fn parse_field<T: FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{name}': {value}")))
}

fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        _ => Err(AppError::BadRequest(format!(
            "Invalid value for '{name}': {value}"
        ))),
    }
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.file = Some((file_name, data.to_vec()));
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "title" => form.title = Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            "description" => form.description = Some(text),
            "licence" => form.licence = Some(parse_field(&name, &text)?),
            "album_id" => form.album_id = Some(parse_field(&name, &text)?),
            "album_order" => form.album_order = Some(parse_field(&name, &text)?),
            "private" => form.private = Some(parse_flag(&name, &text)?),
            "show_dl_link" => form.show_dl_link = Some(parse_flag(&name, &text)?),
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{user_id}/tracks?with_private=&only_ready=&page=&page_size=
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<TrackListParams>,
) -> AppResult<impl IntoResponse> {
    let opts = TrackListOptions {
        user_id,
        with_private: params.with_private,
        get_all: false,
        page: params.page,
        page_size: params.page_size,
        only_ready: params.only_ready,
    };
    let page = TrackRepo::list(&state.pool, &opts).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/users/{user_id}/tracks
///
/// Multipart form with a required `file` field and optional `title`,
/// `description`, `licence`, `album_id`, `album_order`, `private` and
/// `show_dl_link` fields. The title defaults to the uploaded file name
/// without extension.
///
/// The file is written first; if the track row cannot be created the file
/// is removed again.
pub async fn upload(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, user_id).await?;
    let form = read_upload_form(multipart).await?;

    let (file_name, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let filename_orig = original_stem(&file_name);
    let title = form.title.unwrap_or_else(|| filename_orig.clone());
    if title.is_empty() {
        return Err(AppError::BadRequest("A title is required".into()));
    }
    if TrackRepo::title_exists(&state.pool, user.id, &title).await? {
        return Err(DbError::TrackTitleAlreadyExists {
            user_id: user.id,
            title,
        }
        .into());
    }

    let hash = track_hash(&title, user.id, chrono::Utc::now());
    let filename = stored_filename(&hash, &file_name);
    let mimetype = state
        .storage
        .save_track_file(&user.slug, &filename, &data)
        .await?;

    let input = CreateTrack {
        hash,
        user_id: user.id,
        title,
        description: form.description,
        licence: form.licence,
        filename: filename.clone(),
        filename_orig,
        transcode_needed: needs_transcode(&mimetype),
        mimetype,
        album_id: form.album_id,
        album_order: form.album_order,
        private: form.private,
        show_dl_link: form.show_dl_link,
    };

    let track = match TrackRepo::create(&state.pool, &input).await {
        Ok(track) => track,
        Err(e) => {
            tracing::warn!(user_id = user.id, file = %filename, error = %e, "Track creation failed, removing upload");
            state
                .storage
                .remove_track_files(&user.slug, &filename, false)
                .await;
            return Err(e.into());
        }
    };

    let item = CreateTimelineItem {
        user_id: user.id,
        track_id: Some(track.id),
        album_id: None,
    };
    if let Err(e) = TimelineItemRepo::create(&state.pool, &item).await {
        tracing::warn!(track_id = track.id, error = %e, "Cannot create timeline item");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// GET /api/v1/users/{user_id}/tracks/{slug}
///
/// The track with its owner and track info.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path((user_id, slug)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::find_with_info_by_slug_and_user(&state.pool, user_id, &slug).await?;
    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/users/{user_id}/tracks/{id}
///
/// Responds with what was removed besides the row, including any file that
/// could not be deleted.
pub async fn delete(
    State(state): State<AppState>,
    Path((user_id, track_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deletion = TrackRepo::delete(&state.pool, &state.storage, track_id, user_id).await?;
    Ok(Json(DataResponse { data: deletion }))
}

/// POST /api/v1/users/{user_id}/storage/reconcile
///
/// Remove files in the user's directory that belong to no stored track.
pub async fn reconcile(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = purge_orphaned_files(&state.pool, &state.storage, user_id).await?;
    Ok(Json(DataResponse { data: report }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn flags_accept_form_spellings() {
        assert!(parse_flag("private", "on").unwrap());
        assert!(parse_flag("private", "TRUE").unwrap());
        assert!(!parse_flag("private", "0").unwrap());
        assert_matches!(parse_flag("private", "maybe"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn numeric_fields_are_parsed() {
        assert_eq!(parse_field::<i32>("licence", " 3 ").unwrap(), 3);
        assert_matches!(
            parse_field::<i64>("album_id", "abc"),
            Err(AppError::BadRequest(_))
        );
    }
}
