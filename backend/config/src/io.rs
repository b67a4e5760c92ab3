//! Config file read/write with atomic replace and a single backup.

use crate::schema::HostwatchConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Hostwatch config directory.
/// Priority: `HOSTWATCH_CONFIG_DIR` env > `~/.hostwatch/` > `./.hostwatch`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HOSTWATCH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".hostwatch");
    }
    PathBuf::from(".hostwatch")
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<HostwatchConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(HostwatchConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(HostwatchConfig::default());
    }

    let config: HostwatchConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename).
///
/// The previous file, if any, is kept as `config.yaml.bak`.
pub async fn write_config(config: &HostwatchConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        let bak = path.with_extension("yaml.bak");
        if let Err(e) = fs::copy(path, &bak).await {
            warn!("Failed to create backup {}: {}", bak.display(), e);
        }
    }

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!("Failed to rename temp config to: {}", path.display())
    })?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}
