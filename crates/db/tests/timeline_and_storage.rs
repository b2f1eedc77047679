//! Collaborator repositories (users, albums, track infos, timeline items)
//! and storage reconciliation against a real database.

use assert_matches::assert_matches;
use reel2bits_core::storage::TrackStorage;
use reel2bits_db::models::album::CreateAlbum;
use reel2bits_db::models::timeline_item::CreateTimelineItem;
use reel2bits_db::models::track::CreateTrack;
use reel2bits_db::models::track_info::CreateTrackInfo;
use reel2bits_db::models::user::CreateUser;
use reel2bits_db::reconcile::purge_orphaned_files;
use reel2bits_db::repositories::{AlbumRepo, TimelineItemRepo, TrackInfoRepo, TrackRepo, UserRepo};
use reel2bits_db::DbError;
use sqlx::PgPool;

async fn new_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            slug: None,
            email: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_track(user_id: i64, hash: &str, filename: &str) -> CreateTrack {
    CreateTrack {
        hash: hash.to_string(),
        user_id,
        title: hash.to_string(),
        description: None,
        licence: None,
        filename: filename.to_string(),
        filename_orig: hash.to_string(),
        mimetype: "audio/ogg".to_string(),
        album_id: None,
        album_order: None,
        transcode_needed: true,
        private: None,
        show_dl_link: None,
    }
}

fn new_item(user_id: i64, track_id: Option<i64>, album_id: Option<i64>) -> CreateTimelineItem {
    CreateTimelineItem {
        user_id,
        track_id,
        album_id,
    }
}

// ---------------------------------------------------------------------------
// Users / albums
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_slug_lookup(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            name: "DJ Night Owl".to_string(),
            slug: None,
            email: Some("owl@example.com".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(user.slug, "dj-night-owl");

    let found = UserRepo::find_by_slug(&pool, "dj-night-owl")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert!(UserRepo::find_by_slug(&pool, "nobody")
        .await
        .unwrap()
        .is_none());

    let dup = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".to_string(),
            slug: Some("dj-night-owl".to_string()),
            email: None,
        },
    )
    .await;
    assert!(dup.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_album_create_and_find(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    let album = AlbumRepo::create(
        &pool,
        &CreateAlbum {
            user_id,
            title: "Field Recordings".to_string(),
            description: None,
            private: Some(true),
        },
    )
    .await
    .unwrap();

    assert_eq!(album.slug, format!("{}-field-recordings", album.id));
    assert!(album.is_private());

    let found = AlbumRepo::find_by_id(&pool, album.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.title, "Field Recordings");
    assert!(AlbumRepo::find_by_id(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Track infos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_info_attach_and_delete(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    let track = TrackRepo::create(&pool, &new_track(user_id, "tone", "tone.ogg"))
        .await
        .unwrap();

    let info = TrackInfoRepo::create(
        &pool,
        &CreateTrackInfo {
            duration_secs: Some(12.0),
            channels: Some(2),
            rate: Some(44_100),
            waveform: Some(serde_json::json!([0.1, 0.5, 0.2])),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(TrackInfoRepo::attach_to_track(&pool, track.id, info.id)
        .await
        .unwrap());
    assert!(!TrackInfoRepo::attach_to_track(&pool, 999_999, info.id)
        .await
        .unwrap());
    let linked = TrackRepo::find_by_id(&pool, track.id).await.unwrap();
    assert_eq!(linked.track_info_id, Some(info.id));

    assert!(TrackInfoRepo::delete(&pool, info.id).await.unwrap());
    assert!(!TrackInfoRepo::delete(&pool, info.id).await.unwrap());
    let unlinked = TrackRepo::find_by_id(&pool, track.id).await.unwrap();
    assert_eq!(unlinked.track_info_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_info_for_track_stores_every_field(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    let track = TrackRepo::create(&pool, &new_track(user_id, "tone", "tone.flac"))
        .await
        .unwrap();
    let input = CreateTrackInfo {
        duration_secs: Some(93.5),
        bitrate: Some(320),
        bitrate_mode: Some("CBR".to_string()),
        channels: Some(2),
        codec: Some("mp3".to_string()),
        format: Some("MPEG".to_string()),
        rate: Some(48_000),
        waveform: Some(serde_json::json!([0.3, 0.9])),
    };

    let info = TrackInfoRepo::create_for_track(&pool, track.id, &input)
        .await
        .unwrap()
        .unwrap();
    let stored = TrackInfoRepo::find_by_id(&pool, info.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.duration_secs, Some(93.5));
    assert_eq!(stored.bitrate, Some(320));
    assert_eq!(stored.bitrate_mode.as_deref(), Some("CBR"));
    assert_eq!(stored.channels, Some(2));
    assert_eq!(stored.codec.as_deref(), Some("mp3"));
    assert_eq!(stored.format.as_deref(), Some("MPEG"));
    assert_eq!(stored.rate, Some(48_000));
    assert_eq!(stored.waveform, input.waveform);

    let linked = TrackRepo::find_by_id(&pool, track.id).await.unwrap();
    assert_eq!(linked.track_info_id, Some(info.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_info_for_missing_track(pool: PgPool) {
    let info = TrackInfoRepo::create_for_track(&pool, 999_999, &CreateTrackInfo::default())
        .await
        .unwrap();
    assert!(info.is_none());

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM track_infos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_timeline_delete_by_track(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    TimelineItemRepo::create(&pool, &new_item(user_id, Some(10), None))
        .await
        .unwrap();
    TimelineItemRepo::create(&pool, &new_item(user_id, None, Some(3)))
        .await
        .unwrap();

    let deleted = TimelineItemRepo::delete(&pool, user_id, Some(10), None)
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let left = TimelineItemRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].album_id, Some(3));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_timeline_delete_nothing_matched(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;

    let err = TimelineItemRepo::delete(&pool, user_id, Some(10), None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        DbError::TimelineItemNotFound {
            track_id: Some(10),
            ..
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_timeline_item_needs_a_target(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    let result = TimelineItemRepo::create(&pool, &new_item(user_id, None, None)).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_orphaned_files(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let storage = TrackStorage::new(dir.path());
    let user_id = new_user(&pool, "alice").await;

    let track = TrackRepo::create(&pool, &new_track(user_id, "keep", "keep.ogg"))
        .await
        .unwrap();

    for name in [track.filename.as_str(), "keep.ogg.json", "keep.mp3", "gone.wav"] {
        storage.save_track_file("alice", name, b"data").await.unwrap();
    }

    let report = purge_orphaned_files(&pool, &storage, user_id).await.unwrap();
    assert_eq!(report.removed.len(), 1);
    assert!(report.removed[0].ends_with("gone.wav"));

    let left = storage.list_user_files("alice").await.unwrap();
    assert_eq!(left, ["keep.mp3", "keep.ogg", "keep.ogg.json"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_unknown_user(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let storage = TrackStorage::new(dir.path());

    let err = purge_orphaned_files(&pool, &storage, 999_999)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::UserNotFound(999_999));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_empty_directory(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let storage = TrackStorage::new(dir.path());
    let user_id = new_user(&pool, "alice").await;

    let report = purge_orphaned_files(&pool, &storage, user_id).await.unwrap();
    assert!(report.removed.is_empty());
    assert!(report.is_clean());
}
