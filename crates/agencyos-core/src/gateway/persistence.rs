//! Snapshot persistence gateways

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Snapshot;

/// Loads and saves the full set of collections
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Most recent snapshot, or `None` when nothing was saved yet
    async fn load_snapshot(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Pretty JSON document on disk
///
/// Saves write a sibling `.tmp` file and rename it over the target, so a
/// reader only ever sees a complete snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), tasks = snapshot.tasks.len(), "Loaded snapshot");
        Ok(Some(snapshot))
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                Error::Persistence(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            Error::Persistence(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

/// Keeps the last snapshot in memory; for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryGateway {
    saved: Mutex<Option<Snapshot>>,
    saves: Mutex<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    /// Last saved snapshot
    pub fn saved(&self) -> Option<Snapshot> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        Ok(self.saved())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewTask;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let gateway = JsonFileGateway::new(dir.path().join("absent.json"));
        assert!(gateway.load_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_roundtrip_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");
        let gateway = JsonFileGateway::new(&path);

        let mut snapshot = Snapshot::empty();
        snapshot.tasks.push(NewTask::new("Persist me").into_task());
        gateway.save_snapshot(&snapshot).await.unwrap();

        assert!(path.exists());
        assert!(!gateway.temp_path().exists());
        let loaded = gateway.load_snapshot().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileGateway::new(&path).load_snapshot().await.unwrap_err();
        assert_eq!(err.code(), "E900");
    }

    #[tokio::test]
    async fn test_memory_gateway_counts_saves() {
        let gateway = MemoryGateway::new();
        assert!(gateway.load_snapshot().await.unwrap().is_none());
        gateway.save_snapshot(&Snapshot::empty()).await.unwrap();
        gateway.save_snapshot(&Snapshot::empty()).await.unwrap();
        assert_eq!(gateway.save_count(), 2);
        assert!(gateway.saved().is_some());
    }
}
