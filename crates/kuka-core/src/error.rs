//! Error types for the Kuka chat client.

use crate::notice::Notice;
use thiserror::Error;

/// A shared error type for the Kuka crates.
///
/// Invariant violations carry the [`Notice`] that should be shown to the user,
/// so the application layer can surface exactly one notice per rejected
/// operation without re-deriving the wording.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KukaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An operation was rejected because it would break a state invariant
    #[error("{}: {}", .0.title, .0.description)]
    InvariantViolation(Notice),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KukaError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvariantViolation error from the notice the user should see
    pub fn rejected(notice: Notice) -> Self {
        Self::InvariantViolation(notice)
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected state transition
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    /// Converts the error into the notice shown to the user.
    ///
    /// Invariant violations keep their own wording; anything else becomes a
    /// destructive "Error" notice carrying the error text.
    pub fn to_notice(&self) -> Notice {
        match self {
            Self::InvariantViolation(notice) => notice.clone(),
            other => Notice::error("Error", other.to_string()),
        }
    }
}

impl From<std::io::Error> for KukaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KukaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for KukaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for KukaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KukaError>`.
pub type Result<T> = std::result::Result<T, KukaError>;
