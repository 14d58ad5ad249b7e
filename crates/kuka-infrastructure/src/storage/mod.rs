//! Storage layer for atomic file operations and secrets.

mod atomic_file;
mod secret_storage;

pub use atomic_file::{AtomicFile, AtomicFileError, FileFormat};
pub use secret_storage::{
    API_KEY_ENV, ApiKeyConfig, SecretConfig, SecretStorage, SecretStorageError, resolve_api_key,
};
