//! Repository for the `albums` table.

use reel2bits_core::fake_bool;
use reel2bits_core::slug::entity_slug;
use reel2bits_core::types::DbId;
use sqlx::PgPool;

use crate::models::album::{Album, CreateAlbum};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, slug, private, created_at, updated_at";

/// Provides the album operations tracks rely on.
pub struct AlbumRepo;

impl AlbumRepo {
    /// Insert a new album and derive its slug from the assigned ID, in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateAlbum) -> Result<Album, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO albums (user_id, title, description, private) \
             VALUES ($1, $2, COALESCE($3, ''), $4) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(fake_bool::encode(input.private.unwrap_or(false)))
        .fetch_one(&mut *tx)
        .await?;

        let query = format!("UPDATE albums SET slug = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let album = sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .bind(entity_slug(id, &input.title))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(album)
    }

    /// Find an album by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM albums WHERE id = $1");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
