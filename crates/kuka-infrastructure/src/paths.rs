//! Path management for kuka configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/kuka/              # Config directory
//! ├── config.toml              # API endpoint and retry settings (optional)
//! ├── secret.json              # Bearer token for the inference API (read-only)
//! ├── favorites.json           # Starred model ids
//! └── logs/                    # Application logs
//!     └── kuka.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "kuka";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file location used by kuka.
///
/// `KukaPaths::new(None)` uses the platform config directory
/// (`dirs::config_dir()/kuka`); passing a base directory roots everything
/// there instead, which is what tests do.
#[derive(Debug, Clone, Default)]
pub struct KukaPaths {
    base_override: Option<PathBuf>,
}

impl KukaPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the kuka configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/kuka/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to secret.json.
    ///
    /// # Security Note
    ///
    /// The file holds the bearer token in plain text; keep its permissions
    /// at 600.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the path to favorites.json.
    pub fn favorites_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("favorites.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let paths = KukaPaths::new(Some(PathBuf::from("/tmp/kuka-test")));
        let config_dir = paths.config_dir().unwrap();

        assert_eq!(config_dir, PathBuf::from("/tmp/kuka-test"));
        assert!(paths.config_file().unwrap().ends_with("config.toml"));
        assert!(paths.secret_file().unwrap().ends_with("secret.json"));
        assert!(paths.favorites_file().unwrap().ends_with("favorites.json"));
        assert!(paths.logs_dir().unwrap().starts_with(&config_dir));
    }

    #[test]
    fn test_default_dir_is_named_kuka() {
        if let Ok(config_dir) = KukaPaths::new(None).config_dir() {
            assert!(config_dir.ends_with("kuka"));
        }
    }
}
