//! Repository for the `tracks` table.
//!
//! Besides plain CRUD this owns the track lifecycle rules: per-owner title
//! uniqueness, slug derivation, validated processing state transitions, and
//! the delete cascade to track infos, timeline items, and stored files.

use reel2bits_core::error::CoreError;
use reel2bits_core::fake_bool::{self, BOOL_FALSE, BOOL_TRUE};
use reel2bits_core::licence::is_valid_licence_id;
use reel2bits_core::pagination::page_offset;
use reel2bits_core::processing::{ProcessingState, TrackStateKind};
use reel2bits_core::slug::entity_slug;
use reel2bits_core::storage::TrackStorage;
use reel2bits_core::types::{timestamp_to_unix, DbId};
use sqlx::PgPool;

use crate::error::{DbError, TrackLookup};
use crate::models::track::{
    CreateTrack, Track, TrackDeletion, TrackListOptions, TrackPage, TrackWithInfo, UpdateTrack,
    UpdateTrackState,
};
use crate::repositories::{TimelineItemRepo, TrackInfoRepo, UserRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, hash, user_id, title, description, slug, licence, filename, \
    filename_orig, mimetype, album_id, album_order, transcode_needed, transcode_state, \
    metadatas_state, transcode_start_unix, transcode_stop_unix, processing_error, \
    track_info_id, ready, private, show_dl_link, created_at, updated_at";

/// Provides CRUD, listing, and lifecycle operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    // ── Create / update ──────────────────────────────────────────────

    /// Whether `user_id` already owns a track titled `title`.
    pub async fn title_exists(
        pool: &PgPool,
        user_id: DbId,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM tracks WHERE user_id = $1 AND title = $2)",
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new track and derive its slug, in one transaction.
    ///
    /// The transcode state starts as `Waiting` when `transcode_needed` is
    /// set and `NotNeeded` otherwise; the metadata state always starts as
    /// `Waiting`. Fails with [`DbError::TrackTitleAlreadyExists`] if the
    /// owner already has a track with this title.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, DbError> {
        validate_title(&input.title)?;
        validate_licence(input.licence)?;

        if Self::title_exists(pool, input.user_id, &input.title).await? {
            return Err(DbError::TrackTitleAlreadyExists {
                user_id: input.user_id,
                title: input.title.clone(),
            });
        }

        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO tracks
                (hash, user_id, title, description, licence, filename, filename_orig, mimetype,
                 album_id, album_order, transcode_needed, transcode_state, metadatas_state,
                 private, show_dl_link)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, 0), $6, $7, $8,
                     $9, COALESCE($10, 0), $11, $12, $13, $14, $15)
             RETURNING id",
        )
        .bind(&input.hash)
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.licence)
        .bind(&input.filename)
        .bind(&input.filename_orig)
        .bind(&input.mimetype)
        .bind(input.album_id)
        .bind(input.album_order)
        .bind(fake_bool::encode(input.transcode_needed))
        .bind(ProcessingState::initial_transcode(input.transcode_needed).id())
        .bind(ProcessingState::Waiting.id())
        .bind(fake_bool::encode(input.private.unwrap_or(false)))
        .bind(fake_bool::encode(input.show_dl_link.unwrap_or(true)))
        .fetch_one(&mut *tx)
        .await?;

        let query = format!("UPDATE tracks SET slug = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let track = sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(entity_slug(id, &input.title))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(track_id = track.id, user_id = track.user_id, slug = %track.slug, "Track created");
        Ok(track)
    }

    /// Update a track. Only non-`None` fields in `input` are applied, except
    /// that `remove_from_album` clears the album link.
    ///
    /// A new title must not collide with another track of the same owner and
    /// re-derives the slug.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTrack) -> Result<Track, DbError> {
        let current = Self::find_by_id(pool, id).await?;
        validate_licence(input.licence)?;

        let new_slug = match &input.title {
            Some(title) if *title != current.title => {
                validate_title(title)?;
                if Self::title_exists(pool, current.user_id, title).await? {
                    return Err(DbError::TrackTitleAlreadyExists {
                        user_id: current.user_id,
                        title: title.clone(),
                    });
                }
                Some(entity_slug(id, title))
            }
            _ => None,
        };

        let query = format!(
            "UPDATE tracks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                licence = COALESCE($4, licence),
                album_id = CASE WHEN $10 THEN NULL ELSE COALESCE($5, album_id) END,
                album_order = CASE WHEN $10 THEN 0 ELSE COALESCE($6, album_order) END,
                private = COALESCE($7, private),
                show_dl_link = COALESCE($8, show_dl_link),
                slug = COALESCE($9, slug)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.licence)
            .bind(input.album_id)
            .bind(input.album_order)
            .bind(input.private.map(fake_bool::encode))
            .bind(input.show_dl_link.map(fake_bool::encode))
            .bind(new_slug)
            .bind(input.remove_from_album)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::track_not_found(id))
    }

    /// Record progress of one processing step.
    ///
    /// The stored state is read under a row lock and the move to
    /// `input.state` must be a valid transition; otherwise
    /// [`CoreError::InvalidTransition`] is returned and nothing is written.
    pub async fn update_state(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrackState,
    ) -> Result<Track, DbError> {
        let next = ProcessingState::try_from_id(input.state)?;

        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::track_not_found(id))?;

        let from = ProcessingState::try_from_id(current.state_id(input.kind))?;
        from.check_transition(next)?;

        let track = match input.kind {
            TrackStateKind::Transcoding => {
                let query = format!(
                    "UPDATE tracks SET
                        transcode_state = $2,
                        transcode_start_unix = COALESCE($3, transcode_start_unix),
                        transcode_stop_unix = COALESCE($4, transcode_stop_unix),
                        processing_error = COALESCE($5, processing_error)
                     WHERE id = $1
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Track>(&query)
                    .bind(id)
                    .bind(next.id())
                    .bind(input.transcode_start.map(|t| timestamp_to_unix(Some(t))))
                    .bind(input.transcode_stop.map(|t| timestamp_to_unix(Some(t))))
                    .bind(&input.processing_error)
                    .fetch_one(&mut *tx)
                    .await?
            }
            TrackStateKind::Metadatas => {
                let query = format!(
                    "UPDATE tracks SET
                        metadatas_state = $2,
                        processing_error = COALESCE($3, processing_error)
                     WHERE id = $1
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Track>(&query)
                    .bind(id)
                    .bind(next.id())
                    .bind(&input.processing_error)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        tracing::debug!(track_id = id, kind = ?input.kind, %from, to = %next, "Track state updated");
        Ok(track)
    }

    /// Set the readiness flag, returning the updated row.
    pub async fn set_ready(pool: &PgPool, id: DbId, ready: bool) -> Result<Track, DbError> {
        let query = format!("UPDATE tracks SET ready = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(fake_bool::encode(ready))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::track_not_found(id))
    }

    // ── Point lookups ────────────────────────────────────────────────

    /// Find a track by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Track, DbError> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::track_not_found(id))
    }

    /// Find a track by owner and slug.
    pub async fn find_by_slug_and_user(
        pool: &PgPool,
        user_id: DbId,
        slug: &str,
    ) -> Result<Track, DbError> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE user_id = $1 AND slug = $2");
        sqlx::query_as::<_, Track>(&query)
            .bind(user_id)
            .bind(slug)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                DbError::TrackNotFound(TrackLookup::Slug {
                    user_id,
                    slug: slug.to_string(),
                })
            })
    }

    /// Like [`find_by_slug_and_user`](Self::find_by_slug_and_user), with the
    /// owner and the track info (if any) loaded alongside.
    pub async fn find_with_info_by_slug_and_user(
        pool: &PgPool,
        user_id: DbId,
        slug: &str,
    ) -> Result<TrackWithInfo, DbError> {
        let track = Self::find_by_slug_and_user(pool, user_id, slug).await?;
        let user = UserRepo::find_by_id(pool, track.user_id)
            .await?
            .ok_or(DbError::UserNotFound(track.user_id))?;
        let info = match track.track_info_id {
            Some(info_id) => TrackInfoRepo::find_by_id(pool, info_id).await?,
            None => None,
        };
        Ok(TrackWithInfo { track, info, user })
    }

    /// Find the track at `album_order` within an album.
    pub async fn find_by_album_and_order(
        pool: &PgPool,
        album_id: DbId,
        album_order: i64,
    ) -> Result<Track, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks \
             WHERE album_id = $1 AND album_order = $2 \
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(album_id)
            .bind(album_order)
            .fetch_optional(pool)
            .await?
            .ok_or(DbError::TrackNotFound(TrackLookup::AlbumOrder {
                album_id,
                album_order,
            }))
    }

    /// First track of an album by position, optionally among ready public
    /// tracks only. An empty album is a not-found.
    pub async fn first_of_album(
        pool: &PgPool,
        album_id: DbId,
        only_public: bool,
    ) -> Result<Track, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks \
             WHERE album_id = $1 \
               AND (NOT $2::BOOL OR (ready = {BOOL_TRUE} AND private = {BOOL_FALSE})) \
             ORDER BY album_order ASC, id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(album_id)
            .bind(only_public)
            .fetch_optional(pool)
            .await?
            .ok_or(DbError::TrackNotFound(TrackLookup::FirstOfAlbum { album_id }))
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// One page of tracks, newest first, plus the total number of matches.
    ///
    /// See [`TrackListOptions`] for how the filters combine.
    pub async fn list(pool: &PgPool, opts: &TrackListOptions) -> Result<TrackPage, sqlx::Error> {
        let filter = format!(
            "($1::BOOL OR private = {BOOL_FALSE}) \
             AND ($2::BIGINT IS NULL OR user_id = $2) \
             AND (NOT $3::BOOL OR ready = {BOOL_TRUE})"
        );

        let page = opts.page();
        let page_size = opts.page_size();

        let query = format!(
            "SELECT {COLUMNS} FROM tracks WHERE {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        let tracks = sqlx::query_as::<_, Track>(&query)
            .bind(opts.includes_private())
            .bind(opts.owner_filter())
            .bind(opts.only_ready)
            .bind(page_size)
            .bind(page_offset(page, page_size))
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM tracks WHERE {filter}"))
            .bind(opts.includes_private())
            .bind(opts.owner_filter())
            .bind(opts.only_ready)
            .fetch_one(pool)
            .await?;

        Ok(TrackPage {
            tracks,
            total,
            page,
            page_size,
        })
    }

    /// Tracks still waiting to become ready, oldest first. Tracks whose
    /// transcoding failed are left out; they need a re-queue, not a poll.
    pub async fn list_not_ready(pool: &PgPool) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks \
             WHERE ready = {BOOL_FALSE} AND transcode_state <> $1 \
             ORDER BY created_at ASC, id ASC"
        );
        let result = sqlx::query_as::<_, Track>(&query)
            .bind(ProcessingState::Failed.id())
            .fetch_all(pool)
            .await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Cannot get un-ready tracks");
        }
        result
    }

    /// Tracks of an album by position, optionally only ready public ones.
    pub async fn list_album_tracks(
        pool: &PgPool,
        album_id: DbId,
        only_public: bool,
    ) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks \
             WHERE album_id = $1 \
               AND (NOT $2::BOOL OR (ready = {BOOL_TRUE} AND private = {BOOL_FALSE})) \
             ORDER BY album_order ASC, id ASC"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(album_id)
            .bind(only_public)
            .fetch_all(pool)
            .await
    }

    /// Stored filenames of every track owned by `user_id`.
    pub async fn list_stored_filenames(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT filename FROM tracks WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(f,)| f).collect())
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete a track owned by `user_id` together with everything hanging
    /// off it.
    ///
    /// Order: the track row and its track info (if any) go in one
    /// transaction; then the timeline item, whose failure is only logged;
    /// then the files, each removal best-effort. A crash after the commit
    /// leaves orphaned files for [`crate::reconcile`] to collect.
    pub async fn delete(
        pool: &PgPool,
        storage: &TrackStorage,
        track_id: DbId,
        user_id: DbId,
    ) -> Result<TrackDeletion, DbError> {
        let track = Self::find_by_id(pool, track_id).await?;
        if track.user_id != user_id {
            return Err(DbError::track_not_found(track_id));
        }

        let info = match track.track_info_id {
            Some(info_id) => TrackInfoRepo::find_by_id(pool, info_id).await?,
            None => None,
        };

        let user = UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(DbError::UserNotFound(user_id))?;

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(track.id)
            .execute(&mut *tx)
            .await?;
        if let Some(info) = &info {
            sqlx::query("DELETE FROM track_infos WHERE id = $1")
                .bind(info.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        let timeline_item_deleted =
            match TimelineItemRepo::delete(pool, user.id, Some(track.id), None).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(track_id = track.id, user_id = user.id, error = %e, "Cannot delete timeline item");
                    false
                }
            };

        tracing::info!(track_id = track.id, title = %track.title, "Deleted track record");

        let files = storage
            .remove_track_files(&user.slug, &track.filename, track.has_transcode())
            .await;
        if !files.is_clean() {
            tracing::warn!(
                track_id = track.id,
                failed = files.failed.len(),
                "Some track files could not be removed"
            );
        }

        Ok(TrackDeletion {
            track_id: track.id,
            info_deleted: info.is_some(),
            timeline_item_deleted,
            files,
        })
    }
}

/// Longest accepted track title, in characters.
const MAX_TITLE_LEN: usize = 255;

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Track title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Track title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_licence(licence: Option<i32>) -> Result<(), CoreError> {
    match licence {
        Some(id) if !is_valid_licence_id(id) => {
            Err(CoreError::Validation(format!("Unknown licence id {id}")))
        }
        _ => Ok(()),
    }
}
