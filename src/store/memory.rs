//! In-memory snapshot store for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::{SnapshotKey, SnapshotRecord, SnapshotStore, StoreError};

/// In-memory snapshot store.
///
/// Records are kept as JSON text so tests can plant malformed entries the
/// same way a hand-edited file would look on disk.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    records: Mutex<BTreeMap<SnapshotKey, String>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key` without validation.
    pub fn insert_raw(&self, key: &str, text: impl Into<String>) {
        self.records.lock().insert(SnapshotKey::normalize(key), text.into());
    }

    /// Number of stored records, valid or not.
    pub fn num_records(&self) -> usize {
        self.records.lock().len()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn read_record(&self, key: &SnapshotKey) -> Result<Option<SnapshotRecord>, StoreError> {
        let text = match self.records.lock().get(key) {
            Some(text) => text.clone(),
            None => return Ok(None),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Malformed { key: key.clone(), source })
    }

    async fn write_record(&self, key: &SnapshotKey, record: &SnapshotRecord) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(record)?;
        self.records.lock().insert(key.clone(), text);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<SnapshotKey>, StoreError> {
        let records = self.records.lock();
        Ok(records
            .iter()
            .filter(|(key, text)| {
                let ok = serde_json::from_str::<SnapshotRecord>(text).is_ok();
                if !ok {
                    tracing::warn!(key = %key, "Skipping malformed snapshot record");
                }
                ok
            })
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete(&self, key: &SnapshotKey) -> Result<bool, StoreError> {
        Ok(self.records.lock().remove(key).is_some())
    }
}
