//! Secret configuration file storage.
//!
//! Loads the inference API bearer token from ~/.config/kuka/secret.json, with
//! the `OPENROUTER_API_KEY` environment variable as fallback.

use crate::paths::KukaPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable consulted when secret.json has no key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Contents of secret.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openrouter: Option<ApiKeyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    pub api_key: String,
}

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Neither the file nor the environment provide a key.
    MissingKey,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::MissingKey => write!(
                f,
                "{} not found in secret.json or environment variables",
                API_KEY_ENV
            ),
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Read-only access to secret.json.
///
/// Does NOT write or validate keys; the token is supplied externally.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Uses the secret.json location from `paths`.
    pub fn new(paths: &KukaPaths) -> Option<Self> {
        paths.secret_file().ok().map(Self::with_path)
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses secret.json.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Resolves the bearer token: secret.json first, then `OPENROUTER_API_KEY`.
///
/// A present but blank key in the file counts as missing.
pub fn resolve_api_key(storage: Option<&SecretStorage>) -> Result<String, SecretStorageError> {
    if let Some(storage) = storage {
        match storage.load() {
            Ok(SecretConfig {
                openrouter: Some(config),
            }) if !config.api_key.trim().is_empty() => return Ok(config.api_key),
            Ok(_) | Err(SecretStorageError::NotFound(_)) => {}
            Err(err) => {
                tracing::warn!(path = %storage.path().display(), "ignoring unreadable secret file: {}", err);
            }
        }
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(SecretStorageError::MissingKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ "openrouter": { "api_key": "sk-or-123" } }"#).unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();

        assert_eq!(config.openrouter.unwrap().api_key, "sk-or-123");
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{ invalid json").unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(SecretStorageError::ParseError(_))));
    }

    #[test]
    fn test_resolve_prefers_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ "openrouter": { "api_key": "from-file" } }"#).unwrap();
        let storage = SecretStorage::with_path(file_path);

        assert_eq!(resolve_api_key(Some(&storage)).unwrap(), "from-file");
    }
}
