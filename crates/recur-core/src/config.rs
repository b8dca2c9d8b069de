//! Configuration for recur
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a three-layer resolution:
//! 1. An explicit path (`--config`), if it exists
//! 2. An override in the data dir (~/.local/share/recur/config/detection.toml)
//! 3. The embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detect::DetectionConfig;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/detection.toml");

/// Where confirmed subscriptions are persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store file; `None` uses [`default_store_path`]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured path, else the platform default
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_store_path)
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Parse and validate TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.detection.validate()?;
        Ok(config)
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }
}

/// Application data directory (~/.local/share/recur on Linux)
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("recur"))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("config").join("detection.toml"))
}

/// Default subscription store path
pub fn default_store_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("subscriptions.json"))
}

fn read_config(path: &Path) -> Result<AppConfig> {
    debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    AppConfig::from_toml(&content)
}

/// Load configuration (explicit path, then data dir override, then default)
pub fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = override_path {
        if path.exists() {
            return read_config(path);
        }
        warn!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return AppConfig::embedded();
    }

    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => AppConfig::embedded(),
    }
}
