//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity is editable, an update DTO (all `Option` fields)

pub mod album;
pub mod timeline_item;
pub mod track;
pub mod track_info;
pub mod user;
