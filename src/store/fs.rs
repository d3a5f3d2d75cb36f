//! Directory-backed snapshot store: one `<key>.json` file per snapshot.
//!
//! The directory is created lazily on first access. Writes are not atomic
//! and the exists-then-create check on the directory can race with another
//! writer; both are accepted since a view is the only writer of its folder.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{SnapshotKey, SnapshotRecord, SnapshotStore, StoreError};

const RECORD_EXTENSION: &str = "json";

/// Snapshot store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `dir`. Nothing is touched until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(format!("{}.{}", key.as_str(), RECORD_EXTENSION))
    }

    /// Create the backing directory if it does not exist. Idempotent.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        let exists = tokio::fs::try_exists(&self.dir).await.unwrap_or(false);
        if exists {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::CreateDir { path: self.dir.clone(), source })?;
        tracing::info!(dir = %self.dir.display(), "Created snapshot directory");
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn read_record(&self, key: &SnapshotKey) -> Result<Option<SnapshotRecord>, StoreError> {
        self.ensure_dir().await?;
        let path = self.record_path(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Malformed { key: key.clone(), source })
    }

    async fn write_record(&self, key: &SnapshotKey, record: &SnapshotRecord) -> Result<(), StoreError> {
        self.ensure_dir().await?;
        let path = self.record_path(key);
        let bytes = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io { path, source })
    }

    async fn list_keys(&self) -> Result<Vec<SnapshotKey>, StoreError> {
        self.ensure_dir().await?;
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|source| StoreError::Io { path: self.dir.clone(), source })?;

        let mut keys = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "Stopped reading snapshot directory");
                    break;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping snapshot with non UTF-8 name");
                continue;
            };
            let key = SnapshotKey::from_stored(stem.to_string());
            match self.read_record(&key).await {
                Ok(Some(_)) => keys.push(key),
                Ok(None) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping malformed snapshot record"),
            }
        }
        Ok(keys)
    }

    async fn delete(&self, key: &SnapshotKey) -> Result<bool, StoreError> {
        let path = self.record_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
