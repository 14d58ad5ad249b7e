//! Starred models.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ordered set of starred model ids (insertion order, no duplicates).
///
/// Favorites only influence the ordering of the model-selection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut favorites = Self::new();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Flips membership. Returns `true` if the model is starred afterwards.
    pub fn toggle(&mut self, model_id: &str) -> bool {
        if self.contains(model_id) {
            self.ids.retain(|id| id != model_id);
            false
        } else {
            self.ids.push(model_id.to_string());
            true
        }
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.ids.iter().any(|id| id == model_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Durable storage for the favorites list.
///
/// Implementations load the list once at startup and rewrite it in full on
/// every change.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Loads the stored list. A missing store yields an empty list.
    async fn load(&self) -> Result<Favorites>;

    /// Replaces the stored list.
    async fn save(&self, favorites: &Favorites) -> Result<()>;
}
