//! Atomic read/replace of small serialized files.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn name(self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// Parse or serialization error, tagged with the format name.
    FormatError { format: &'static str, message: String },
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::FormatError { format, message } => {
                write!(f, "{} error: {}", format, message)
            }
            AtomicFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<AtomicFileError> for kuka_core::KukaError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::IoError(e) => e.into(),
            AtomicFileError::FormatError { format, message } => Self::Serialization {
                format: format.to_string(),
                message,
            },
            AtomicFileError::LockError(message) => Self::io(message),
        }
    }
}

/// A handle to a serialized file that is replaced atomically.
///
/// Provides:
/// - **Atomicity**: writes go to a temp file that is renamed over the target
/// - **Durability**: the temp file is fsynced before the rename
/// - **Isolation**: `save` holds an exclusive lock while writing
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        self.decode(&content).map(Some)
    }

    /// Serializes `data` and atomically replaces the file.
    ///
    /// Holds an exclusive lock on the sibling `.lock` file for the whole write, so
    /// concurrent writers (other threads or processes) never share the
    /// temp file.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        let encoded = self.encode(data)?;
        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn decode(&self, content: &str) -> Result<T, AtomicFileError> {
        let result = match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        result.map_err(|message| AtomicFileError::FormatError {
            format: self.format.name(),
            message,
        })
    }

    fn encode(&self, data: &T) -> Result<String, AtomicFileError> {
        let result = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::to_string_pretty(data).map_err(|e| e.to_string()),
        };
        result.map_err(|message| AtomicFileError::FormatError {
            format: self.format.name(),
            message,
        })
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let invalid = |reason: &str| {
            AtomicFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                reason.to_string(),
            ))
        };
        let parent = self
            .path
            .parent()
            .ok_or_else(|| invalid("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| invalid("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on the sibling `.lock` file, released on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()
            .map_err(|e| AtomicFileError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;

        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "test".to_string(),
            count: 42,
        }
    }

    #[test]
    fn test_json_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Sample>::json(temp_dir.path().join("sample.json"));

        file.save(&sample()).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_toml_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Sample>::toml(temp_dir.path().join("sample.toml"));

        file.save(&sample()).unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("count = 42"));
        assert_eq!(file.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_missing_and_empty_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.json");
        let file = AtomicFile::<Sample>::json(path.clone());

        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_invalid_content_is_a_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AtomicFile::<Sample>::json(path).load().unwrap_err();
        assert!(matches!(err, AtomicFileError::FormatError { format: "JSON", .. }));
    }

    #[test]
    fn test_save_creates_parent_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Sample>::json(temp_dir.path().join("nested/sample.json"));

        file.save(&sample()).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample()));
        assert!(!temp_dir.path().join("nested/sample.lock").exists());
        assert!(!temp_dir.path().join("nested/.sample.json.tmp").exists());
    }

    #[test]
    fn test_save_waits_for_lock_holder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.json");
        let lock = FileLock::acquire(&path).unwrap();

        let writer = std::thread::spawn({
            let path = path.clone();
            move || AtomicFile::<Sample>::json(path).save(&sample())
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert!(!path.exists());

        drop(lock);
        writer.join().unwrap().unwrap();

        assert_eq!(AtomicFile::<Sample>::json(path).load().unwrap(), Some(sample()));
    }
}
