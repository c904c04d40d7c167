//! Application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::DbService;
use crate::error::AppError;
use crate::services::{ImageStore, image_store};

/// Shared application state — cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Product image storage backend
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Initialize the working directory, database and image store
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db = DbService::new(&config.database_path).await?;
        let images = image_store::from_config(config)?;

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            images,
        })
    }

    #[cfg(test)]
    pub(crate) async fn for_tests(pool: SqlitePool, images_root: std::path::PathBuf) -> Self {
        Self {
            config: Config::with_overrides(
                images_root.to_string_lossy().into_owned(),
                0,
            ),
            pool,
            images: Arc::new(crate::services::LocalImageStore::new(images_root)),
        }
    }
}
