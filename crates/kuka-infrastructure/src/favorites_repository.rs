//! favorites.json backed implementation of `FavoritesRepository`.

use crate::paths::KukaPaths;
use crate::storage::AtomicFile;
use async_trait::async_trait;
use kuka_core::error::{KukaError, Result};
use kuka_core::favorites::{Favorites, FavoritesRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Stores the favorites list as a JSON array of model ids.
#[derive(Clone)]
pub struct FileFavoritesRepository {
    file: Arc<AtomicFile<Favorites>>,
}

impl FileFavoritesRepository {
    pub fn new(paths: &KukaPaths) -> Result<Self> {
        let path = paths
            .favorites_file()
            .map_err(|e| KukaError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::json(path)),
        }
    }
}

#[async_trait]
impl FavoritesRepository for FileFavoritesRepository {
    async fn load(&self) -> Result<Favorites> {
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| KukaError::internal(format!("favorites load task failed: {e}")))??;
        Ok(loaded.unwrap_or_default())
    }

    async fn save(&self, favorites: &Favorites) -> Result<()> {
        let file = Arc::clone(&self.file);
        let favorites = favorites.clone();
        tokio::task::spawn_blocking(move || file.save(&favorites))
            .await
            .map_err(|e| KukaError::internal(format!("favorites save task failed: {e}")))??;
        Ok(())
    }
}
