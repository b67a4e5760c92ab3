use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use hostwatch_config::{config_dir, config_file_path, load_and_prepare, HostwatchConfig};
use hostwatch_core::{AuthorizationClassifier, Collaborators, FileSessionCache, SessionLifecycle};
use hostwatch_remote::InventoryClient;

/// Resolved client configuration plus the pieces built from it.
pub struct Runtime {
    pub config: HostwatchConfig,
    pub config_path: PathBuf,
    pub client: Arc<InventoryClient>,
}

impl Runtime {
    /// Load `config.yaml` (or `path`), apply env overrides and defaults, and
    /// build the HTTP client.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| config_file_path(&config_dir()));
        let config = load_and_prepare(&config_path)
            .await
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let client = InventoryClient::new(
            config.base_url(),
            Duration::from_secs(config.timeout_secs()),
        )?;

        Ok(Self {
            config,
            config_path,
            client: Arc::new(client),
        })
    }

    fn base_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.config
            .session
            .as_ref()
            .and_then(|s| s.cache_dir.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.base_dir().join("session"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config
            .logging
            .as_ref()
            .and_then(|l| l.dir.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.base_dir().join("logs"))
    }

    pub fn log_json(&self) -> bool {
        self.config
            .logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }

    /// A fresh lifecycle bound to the configured session slot. Nothing is
    /// restored until `startup()` runs.
    pub fn lifecycle(&self) -> SessionLifecycle {
        let cache = FileSessionCache::new(self.cache_dir(), self.config.storage_key());
        SessionLifecycle::new(
            Arc::new(cache),
            Collaborators::from_service(self.client.clone()),
            AuthorizationClassifier::new(self.config.privileged_identifier()),
        )
    }
}
