pub mod album;
pub mod track;
pub mod user_track;
