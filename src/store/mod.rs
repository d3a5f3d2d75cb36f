//! Snapshot storage backends.
//!
//! A backend only knows how to read, write, list and delete flat records.
//! Merge-on-save and key normalization live in the provided methods of
//! [`SnapshotStore`] so every backend gets them for free.

pub mod key;
pub mod fs;
pub mod memory;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::{Coordinate, NodeId, PositionSnapshot};

pub use key::{SnapshotKey, sort_keys_recent_first};
pub use fs::FsSnapshotStore;
pub use memory::InMemorySnapshotStore;

/// Flat record persisted per key: id-sorted `{x, y}` only.
pub type SnapshotRecord = BTreeMap<NodeId, Coordinate>;

/// Error type for snapshot storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage location could not be created.
    #[error("Failed to create snapshot directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Reading or writing a record failed.
    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        /// Record path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A stored record is not a valid snapshot.
    #[error("Malformed snapshot record {key}: {source}")]
    Malformed {
        /// Offending key.
        key: SnapshotKey,
        /// Parse error.
        source: serde_json::Error,
    },
    /// A snapshot could not be serialized.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trait for snapshot storage backends.
///
/// Keys passed to the required methods are already normalized.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read one record. `Ok(None)` if the key does not exist.
    async fn read_record(&self, key: &SnapshotKey) -> Result<Option<SnapshotRecord>, StoreError>;

    /// Write (create or replace) one record.
    async fn write_record(&self, key: &SnapshotKey, record: &SnapshotRecord) -> Result<(), StoreError>;

    /// Enumerate stored keys, unsorted. Malformed records are skipped.
    async fn list_keys(&self) -> Result<Vec<SnapshotKey>, StoreError>;

    /// Delete a record. Returns false if it did not exist.
    async fn delete(&self, key: &SnapshotKey) -> Result<bool, StoreError>;

    /// Load a snapshot; empty if the key is unknown.
    async fn load(&self, key: &str) -> Result<PositionSnapshot, StoreError> {
        let key = SnapshotKey::normalize(key);
        let snapshot = self
            .read_record(&key)
            .await?
            .map(PositionSnapshot::from_coordinates)
            .unwrap_or_default();
        tracing::debug!(key = %key, nodes = snapshot.len(), "Snapshot loaded");
        Ok(snapshot)
    }

    /// Save a snapshot, filling ids it lacks from `previous_key`.
    ///
    /// Nodes that were off-screen or unloaded when `positions` was captured
    /// keep the coordinates recorded by the previously active snapshot.
    /// Returns the normalized key the record was stored under.
    async fn save(
        &self,
        key: &str,
        positions: &PositionSnapshot,
        previous_key: Option<&str>,
    ) -> Result<SnapshotKey, StoreError> {
        let key = SnapshotKey::normalize(key);
        let merged = match previous_key {
            Some(prev) => {
                let previous = self.load(prev).await?;
                let filled = previous.iter().filter(|(id, _)| !positions.contains(id)).count();
                if filled > 0 {
                    tracing::debug!(key = %key, previous = prev, filled, "Filled missing nodes from previous snapshot");
                }
                positions.clone().merged_over(&previous)
            }
            None => positions.clone(),
        };
        self.write_record(&key, &merged.to_record()).await?;
        tracing::info!(key = %key, nodes = merged.len(), "Snapshot saved");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodePosition;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[tokio::test]
    async fn test_merge_on_save() {
        let store = InMemorySnapshotStore::new();
        let previous = PositionSnapshot::new()
            .with("a", NodePosition::free(1.0, 1.0))
            .with("b", NodePosition::free(2.0, 2.0));
        store.save("prev", &previous, None).await.unwrap();

        let update = PositionSnapshot::new().with("a", NodePosition::free(9.0, 9.0));
        store.save("next", &update, Some("prev")).await.unwrap();

        let loaded = store.load("next").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(&id("a")).unwrap().coordinate(), Coordinate::new(9.0, 9.0));
        assert_eq!(loaded.get(&id("b")).unwrap().coordinate(), Coordinate::new(2.0, 2.0));
    }

    #[tokio::test]
    async fn test_unknown_previous_key_merges_nothing() {
        let store = InMemorySnapshotStore::new();
        let update = PositionSnapshot::new().with("a", NodePosition::free(9.0, 9.0));
        store.save("next", &update, Some("missing")).await.unwrap();
        assert_eq!(store.load("next").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_unknown_is_empty() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_strips_pins() {
        let store = InMemorySnapshotStore::new();
        let snap = PositionSnapshot::new().with("a", NodePosition::fixed(3.0, 4.0));
        store.save("k", &snap, None).await.unwrap();
        let loaded = store.load("k").await.unwrap();
        assert_eq!(loaded.get(&id("a")), Some(&NodePosition::free(3.0, 4.0)));
    }

    #[tokio::test]
    async fn test_save_returns_normalized_key() {
        let store = InMemorySnapshotStore::new();
        let key = store.save("", &PositionSnapshot::new(), None).await.unwrap();
        assert_eq!(key.as_str(), "null");
        assert_eq!(store.list_keys().await.unwrap(), vec![key]);
    }
}
