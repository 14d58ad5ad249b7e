//! Model catalog domain types.

use crate::favorites::Favorites;
use serde::{Deserialize, Serialize};

/// A model offered by the inference API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The list of models available for selection, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    models: Vec<Model>,
}

impl Catalog {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn find(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.id == model_id)
    }

    /// Human-readable name for a model id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, model_id: &'a str) -> &'a str {
        self.find(model_id)
            .map(|model| model.name.as_str())
            .unwrap_or(model_id)
    }

    /// Models whose name contains `term` (case-insensitive), favorites first.
    ///
    /// The sort is stable, so catalog order is kept within the favorite and
    /// non-favorite groups.
    pub fn browse(&self, term: &str, favorites: &Favorites) -> Vec<&Model> {
        let needle = term.to_lowercase();
        let mut matches: Vec<&Model> = self
            .models
            .iter()
            .filter(|model| model.name.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by_key(|model| !favorites.contains(&model.id));
        matches
    }
}
