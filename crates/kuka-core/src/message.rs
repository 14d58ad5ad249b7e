//! Transcript message types.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply produced by a model.
    Assistant,
}

/// A single entry in a room transcript.
///
/// Assistant replies record the model that produced them in `model_id`
/// instead of embedding it in the text, so ids containing `:` stay
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Catalog id of the model that produced an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            model_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn assistant(model_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            model_id: Some(model_id.into()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Renders the message the way transcripts display it:
    /// `"[model]: text"` for model replies, the bare text otherwise.
    pub fn display_line(&self) -> String {
        match (&self.role, &self.model_id) {
            (MessageRole::Assistant, Some(model_id)) => format!("[{model_id}]: {}", self.content),
            _ => self.content.clone(),
        }
    }
}
