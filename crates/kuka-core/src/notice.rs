//! User-visible notices.

use serde::{Deserialize, Serialize};

/// How prominently a notice should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A short message for the user (title plus description).
///
/// Every rejected operation and every surfaced failure produces exactly one
/// notice; front ends decide how to render them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: NoticeVariant,
}

impl Notice {
    /// An informational notice.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    /// A destructive (error) notice.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }

    pub fn no_models_for_room() -> Self {
        Self::error(
            "No Models Selected",
            "Please select at least one model before adding a room.",
        )
    }

    pub fn no_models_for_message() -> Self {
        Self::error(
            "No Models Selected",
            "Please select at least one model before sending a message.",
        )
    }

    pub fn last_room() -> Self {
        Self::error("Cannot Delete", "You must have at least one chat room.")
    }

    pub fn chat_cleared() -> Self {
        Self::info("Chat Cleared", "All chat messages have been removed.")
    }

    pub fn models_cleared() -> Self {
        Self::info("Models Cleared", "All selected models have been cleared.")
    }

    pub fn catalog_unavailable() -> Self {
        Self::error("Error", "Failed to fetch models. Please try again later.")
    }

    pub fn dispatch_failed() -> Self {
        Self::error(
            "Error",
            "Failed to get responses from the model(s). Please try again.",
        )
    }

    pub fn room_closed(room_name: &str) -> Self {
        Self::error(
            "Room Closed",
            format!("Replies for \"{room_name}\" were discarded because the room was deleted."),
        )
    }
}
