//! JSON file subscription store

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use super::SubscriptionStore;
use crate::error::{Error, Result};
use crate::models::Subscription;

/// Stores the subscription list as pretty-printed JSON in a single file.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location
    pub fn at_default_location() -> Result<Self> {
        crate::config::default_store_path()
            .map(Self::new)
            .ok_or_else(|| Error::Store("No data directory available".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SubscriptionStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let dir = self.parent_dir();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::Store(format!(
                    "Failed to create store directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            info!("Created store directory: {}", dir.display());
        }

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, subscriptions)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<Subscription>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::Store(format!(
                "Corrupt store file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
