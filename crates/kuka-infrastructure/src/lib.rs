//! File-backed implementations of the kuka storage concerns: paths,
//! configuration, secrets and the favorites list.

pub mod config;
pub mod favorites_repository;
pub mod paths;
pub mod storage;

pub use crate::config::{ApiConfig, ClientConfig, ConfigService};
pub use crate::favorites_repository::FileFavoritesRepository;
pub use crate::paths::KukaPaths;
