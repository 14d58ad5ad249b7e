//! Client configuration (config.toml).

use crate::paths::KukaPaths;
use crate::storage::AtomicFile;
use kuka_core::RetryPolicy;
use kuka_core::error::{KukaError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the config.toml location.
pub const CONFIG_PATH_ENV: &str = "KUKA_CONFIG";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_APP_TITLE: &str = "KukaChat";
pub const DEFAULT_REFERER: &str = "http://localhost";

/// Inference API endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/models` and `/chat/completions` are appended.
    pub base_url: String,
    /// Sent as `HTTP-Referer` on completion requests.
    pub referer: String,
    /// Sent as `X-Title` on completion requests.
    pub app_title: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Everything read from config.toml. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub retry: RetryPolicy,
}

/// Loads [`ClientConfig`].
pub struct ConfigService {
    file: AtomicFile<ClientConfig>,
}

impl ConfigService {
    /// Uses `$KUKA_CONFIG` when set, otherwise config.toml under `paths`.
    pub fn new(paths: &KukaPaths) -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => paths
                .config_file()
                .map_err(|e| KukaError::config(e.to_string()))?,
        };
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::toml(path),
        }
    }

    /// Reads the config file, falling back to defaults when it is missing.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.file.load()?;
        match config {
            Some(config) => {
                tracing::debug!(path = %self.file.path().display(), "loaded config");
                Ok(config)
            }
            None => Ok(ClientConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.load().unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.app_title, "KukaChat");
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://127.0.0.1:9000/v1\"\n\n[retry]\nmax_attempts = 3\ninitial_backoff_ms = 100\nmultiplier = 2.0\n",
        )
        .unwrap();

        let config = ConfigService::with_path(path).load().unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.api.referer, DEFAULT_REFERER);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(100));
    }

    #[test]
    fn test_load_never_creates_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        assert_eq!(service.load().unwrap(), ClientConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(matches!(err, KukaError::Serialization { ref format, .. } if format == "TOML"));
    }
}
