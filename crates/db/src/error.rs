use std::fmt;

use reel2bits_core::error::CoreError;
use reel2bits_core::types::DbId;

/// Keys used to look a track up, carried by [`DbError::TrackNotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackLookup {
    Id(DbId),
    Slug { user_id: DbId, slug: String },
    AlbumOrder { album_id: DbId, album_order: i64 },
    FirstOfAlbum { album_id: DbId },
}

impl fmt::Display for TrackLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id: {id}"),
            Self::Slug { user_id, slug } => write!(f, "user_id: {user_id}, slug: {slug}"),
            Self::AlbumOrder {
                album_id,
                album_order,
            } => write!(f, "album_id: {album_id}, album_order: {album_order}"),
            Self::FirstOfAlbum { album_id } => write!(f, "album_id: {album_id}, first"),
        }
    }
}

/// Errors returned by the repositories.
///
/// The `*NotFound` and `*AlreadyExists` variants are meant to be matched on;
/// everything else is an opaque storage failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Track title already exists [user_id: {user_id}, title: {title}]")]
    TrackTitleAlreadyExists { user_id: DbId, title: String },

    #[error("Track does not exist [{0}]")]
    TrackNotFound(TrackLookup),

    #[error("Timeline item does not exist [user_id: {user_id}, track_id: {track_id:?}, album_id: {album_id:?}]")]
    TimelineItemNotFound {
        user_id: DbId,
        track_id: Option<DbId>,
        album_id: Option<DbId>,
    },

    #[error("User does not exist [user_id: {0}]")]
    UserNotFound(DbId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DbError {
    pub fn track_not_found(id: DbId) -> Self {
        Self::TrackNotFound(TrackLookup::Id(id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TrackNotFound(_) | Self::TimelineItemNotFound { .. } | Self::UserNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_keys() {
        let err = DbError::TrackNotFound(TrackLookup::Slug {
            user_id: 3,
            slug: "12-intro".into(),
        });
        assert_eq!(
            err.to_string(),
            "Track does not exist [user_id: 3, slug: 12-intro]"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn timeline_message() {
        let err = DbError::TimelineItemNotFound {
            user_id: 1,
            track_id: Some(2),
            album_id: None,
        };
        assert_eq!(
            err.to_string(),
            "Timeline item does not exist [user_id: 1, track_id: Some(2), album_id: None]"
        );
    }
}
