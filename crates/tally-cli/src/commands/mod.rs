//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod vendors;

use std::path::{Path, PathBuf};

use tally_core::TallyConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("config.json")
}

/// Resolve the configuration file: an explicit `--config` path, else the
/// default location when it exists.
pub fn config_file(config_path: Option<&str>) -> Option<PathBuf> {
    match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_config_path()).filter(|p| p.exists()),
    }
}

/// Load configuration, falling back to defaults when no file applies.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TallyConfig> {
    match config_file(config_path) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            read_config(&path)
        }
        None => Ok(TallyConfig::default()),
    }
}

fn read_config(path: &Path) -> anyhow::Result<TallyConfig> {
    TallyConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))
}
