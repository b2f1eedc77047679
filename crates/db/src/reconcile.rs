//! Storage reconciliation: remove files no track row accounts for.
//!
//! Track deletion commits the database side before touching the disk, so an
//! interrupted delete leaves files behind. This sweeps one user's directory
//! and removes everything that is not an artifact of a stored track.
//!
//! Files of an upload whose row is not committed yet look orphaned too; run
//! this while the user has no upload in flight.

use std::collections::HashSet;

use reel2bits_core::storage::{RemovalReport, TrackStorage};
use reel2bits_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::repositories::{TrackRepo, UserRepo};

/// Names in `on_disk` not covered by the artifacts of `stored_filenames`.
pub fn orphaned_files(
    storage: &TrackStorage,
    user_slug: &str,
    stored_filenames: &[String],
    on_disk: &[String],
) -> Result<Vec<String>, DbError> {
    let mut known = HashSet::new();
    for filename in stored_filenames {
        known.extend(storage.track_paths(user_slug, filename)?.file_names());
    }
    Ok(on_disk
        .iter()
        .filter(|name| !known.contains(*name))
        .cloned()
        .collect())
}

/// Delete the orphaned files of `user_id`.
pub async fn purge_orphaned_files(
    pool: &PgPool,
    storage: &TrackStorage,
    user_id: DbId,
) -> Result<RemovalReport, DbError> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(DbError::UserNotFound(user_id))?;

    let stored = TrackRepo::list_stored_filenames(pool, user.id).await?;
    let on_disk = storage.list_user_files(&user.slug).await?;
    let orphans = orphaned_files(storage, &user.slug, &stored, &on_disk)?;

    if orphans.is_empty() {
        tracing::debug!(user_id, "No orphaned files");
        return Ok(RemovalReport::default());
    }

    tracing::info!(user_id, count = orphans.len(), "Removing orphaned files");
    Ok(storage.remove_user_files(&user.slug, &orphans).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn artifacts_of_stored_tracks_are_kept() {
        let storage = TrackStorage::new("/srv/media");
        let on_disk = names(&[
            "abc.flac",
            "abc.flac.json",
            "abc.flac.png",
            "abc.mp3",
            "stale.ogg",
            "stale.ogg.json",
        ]);
        let orphans = orphaned_files(&storage, "alice", &names(&["abc.flac"]), &on_disk).unwrap();
        assert_eq!(orphans, names(&["stale.ogg", "stale.ogg.json"]));
    }

    #[test]
    fn everything_is_orphaned_without_tracks() {
        let storage = TrackStorage::new("/srv/media");
        let on_disk = names(&["a.mp3", "b.wav"]);
        let orphans = orphaned_files(&storage, "alice", &[], &on_disk).unwrap();
        assert_eq!(orphans, on_disk);
    }

    #[test]
    fn unsafe_stored_filename_is_rejected() {
        let storage = TrackStorage::new("/srv/media");
        let result = orphaned_files(&storage, "alice", &names(&["../x"]), &[]);
        assert!(result.is_err());
    }
}
