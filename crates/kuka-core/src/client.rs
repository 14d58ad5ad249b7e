//! Interfaces to the hosted inference API.
//!
//! The core crate only defines the contracts; `kuka-interaction` provides the
//! HTTP implementation and tests provide in-memory ones.

use crate::catalog::Model;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single API call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("request failed: {message}")]
    Transport { message: String, retryable: bool },

    /// The API answered with a non-2xx status.
    #[error("HTTP error! status: {status}, message: {message}")]
    Http { status: u16, message: String },

    /// A 2xx response without a usable completion.
    #[error("Invalid response from model {model}")]
    InvalidResponse { model: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No bearer token was configured.
    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

impl ClientError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Fetches the list of available models.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_models(&self) -> Result<Vec<Model>, ClientError>;
}

/// Requests a single-turn completion from one model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` as the only user message and returns the reply text.
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<String, ClientError>;
}
