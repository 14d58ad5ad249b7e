//! Room domain model.

use crate::message::Message;
use crate::selection::SelectionSet;
use serde::{Deserialize, Serialize};

/// Name of the room that exists at startup.
pub const DEFAULT_ROOM_NAME: &str = "New Room";

/// An independent chat session with its own transcript and model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (UUID format)
    pub id: String,
    /// Human-readable room name
    pub name: String,
    /// Stored transcript, append-only
    pub messages: Vec<Message>,
    /// Models chosen for this room
    pub selected_models: SelectionSet,
}

impl Room {
    /// Creates an empty room with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_selection(name, SelectionSet::new())
    }

    pub fn with_selection(name: impl Into<String>, selected_models: SelectionSet) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            messages: Vec::new(),
            selected_models,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Case-insensitive substring match on the room name.
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}
