//! User entity model and DTOs.
//!
//! Only the columns the track layer needs; accounts and auth live elsewhere.

use reel2bits_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    /// Also the name of the user's storage directory.
    pub slug: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    /// Derived from `name` if omitted.
    pub slug: Option<String>,
    pub email: Option<String>,
}
