//! Durable single-slot storage for the last known session snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

/// A single storage slot holding a serialized session.
///
/// The cache deals in raw text; parsing (and deciding what counts as
/// corrupt) belongs to the reconciler.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Raw slot content, `None` when the slot is empty.
    async fn read(&self) -> Result<Option<String>>;

    /// Replace the slot content. Last write wins.
    async fn write(&self, raw: &str) -> Result<()>;

    /// Empty the slot. Clearing an empty slot is not an error.
    async fn clear(&self) -> Result<()>;
}

/// In-process cache, mostly for tests and embedders without a disk.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionCache {
    slot: Arc<RwLock<Option<String>>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw content already in the slot.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    /// Current content without going through the async trait.
    pub fn snapshot(&self) -> Option<String> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.snapshot())
    }

    async fn write(&self, raw: &str) -> Result<()> {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(raw.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// File-backed slot: `<dir>/<key>.json`, written atomically.
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read session cache: {}", self.path.display())),
        }
    }

    async fn write(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create session cache directory: {}", parent.display())
            })?;
        }

        // Write to temp file, then rename so readers never see half a record.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw.as_bytes())
            .await
            .with_context(|| format!("Failed to write temp session cache: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!("Failed to rename temp session cache to: {}", self.path.display())
        })?;

        debug!(path = %self.path.display(), "Wrote session cache");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared session cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to clear session cache: {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_round_trip_and_clear() {
        let cache = InMemorySessionCache::new();
        assert_eq!(cache.read().await.unwrap(), None);
        cache.write("{}").await.unwrap();
        assert_eq!(cache.read().await.unwrap().as_deref(), Some("{}"));
        cache.clear().await.unwrap();
        assert_eq!(cache.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_cache_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSessionCache::new(dir.path(), "hostwatch_session");
        assert_eq!(cache.read().await.unwrap(), None);
        // Clearing a slot that was never written is fine.
        cache.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_cache_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSessionCache::new(dir.path().join("nested"), "slot");
        cache.write(r#"{"username":"a"}"#).await.unwrap();
        cache.write(r#"{"username":"b"}"#).await.unwrap();
        assert_eq!(
            cache.read().await.unwrap().as_deref(),
            Some(r#"{"username":"b"}"#)
        );
        assert!(!cache.path().with_extension("json.tmp").exists());
        cache.clear().await.unwrap();
        assert!(!cache.path().exists());
    }
}
