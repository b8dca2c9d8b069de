//! Shared command utilities
//!
//! This module contains:
//! - `load_app_config` - Resolve the config file
//! - `open_store` - Pick the subscription store location
//! - `run_detection` - Read a transaction file and detect recurring payments

use std::path::Path;

use anyhow::{Context, Result};
use recur_core::import::read_transactions_file;
use recur_core::{
    detect_subscriptions_with_report, load_config, AppConfig, DetectedSubscription,
    DetectionConfig, DetectionReport, JsonFileStore, Transaction,
};
use tracing::debug;

/// Load config from `--config`, the data dir override, or the built-in defaults
pub fn load_app_config(config_path: Option<&Path>) -> Result<AppConfig> {
    load_config(config_path).context("Failed to load config")
}

/// Open the JSON store at `--store`, the configured path, or the default location
pub fn open_store(store_path: Option<&Path>, config: &AppConfig) -> Result<JsonFileStore> {
    let path = store_path
        .map(Path::to_path_buf)
        .or_else(|| config.store.resolve_path())
        .context("No store location available; pass --store or set [store] path")?;
    debug!("Using subscription store at {}", path.display());
    Ok(JsonFileStore::new(path))
}

pub fn load_transactions(file: &Path) -> Result<Vec<Transaction>> {
    read_transactions_file(file)
        .with_context(|| format!("Failed to read transactions from {}", file.display()))
}

/// Detection settings with an optional `--min-confidence` override
pub fn detection_config(
    config: &AppConfig,
    min_confidence: Option<u32>,
) -> Result<DetectionConfig> {
    let mut detection = config.detection.clone();
    if let Some(min_confidence) = min_confidence {
        detection.min_confidence = min_confidence;
    }
    detection.validate()?;
    Ok(detection)
}

pub fn run_detection(
    config: &AppConfig,
    file: &Path,
    min_confidence: Option<u32>,
) -> Result<(Vec<DetectedSubscription>, DetectionReport)> {
    let detection = detection_config(config, min_confidence)?;
    let transactions = load_transactions(file)?;
    debug!(
        "Read {} transactions from {} (min confidence {})",
        transactions.len(),
        file.display(),
        detection.min_confidence
    );
    Ok(detect_subscriptions_with_report(&transactions, &detection))
}
