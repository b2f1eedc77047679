//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod album_repo;
pub mod timeline_item_repo;
pub mod track_info_repo;
pub mod track_repo;
pub mod user_repo;

pub use album_repo::AlbumRepo;
pub use timeline_item_repo::TimelineItemRepo;
pub use track_info_repo::TrackInfoRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
