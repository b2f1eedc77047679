use std::sync::Arc;

use reel2bits_core::storage::TrackStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reel2bits_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk store of uploaded tracks, rooted at `config.storage_path`.
    pub storage: Arc<TrackStorage>,
}

impl AppState {
    pub fn new(pool: reel2bits_db::DbPool, config: ServerConfig) -> Self {
        let storage = Arc::new(TrackStorage::new(config.storage_path.clone()));
        Self {
            pool,
            config: Arc::new(config),
            storage,
        }
    }
}
