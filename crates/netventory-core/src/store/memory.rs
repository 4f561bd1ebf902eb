//! In-memory store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InventoryData, InventoryStore, StoreError};
use crate::record::DeviceRecord;

/// Volatile store; contents are lost on restart
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<InventoryData>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: RwLock::new(InventoryData::new()),
        }
    }

    /// Store pre-populated with `records`
    ///
    /// # Errors
    /// Returns `DuplicateKey` if two records share a unique field.
    pub fn with_records(records: impl IntoIterator<Item = DeviceRecord>) -> Result<Self, StoreError> {
        let mut data = InventoryData::new();
        for record in records {
            data.insert(record)?;
        }
        Ok(Self {
            data: RwLock::new(data),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(self.data.read().await.devices.get(hostname).cloned())
    }

    async fn insert(&self, record: DeviceRecord) -> Result<(), StoreError> {
        self.data.write().await.insert(record)
    }

    async fn all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        Ok(self.data.read().await.records())
    }

    async fn delete(&self, hostname: &str) -> Result<bool, StoreError> {
        Ok(self.data.write().await.devices.remove(hostname).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UniqueField;
    use crate::store::test_support::record;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        store.insert(record("r1", "10.0.0.1", "S1")).await.unwrap();

        let found = store.find_by_hostname("r1").await.unwrap().unwrap();
        assert_eq!(found.address, "10.0.0.1");
        assert!(store.find_by_hostname("r2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_fields_rejected() {
        let store = MemoryStore::new();
        store.insert(record("r1", "10.0.0.1", "S1")).await.unwrap();

        let err = store.insert(record("r1", "10.0.0.2", "S2")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: UniqueField::Hostname, .. }));

        let err = store.insert(record("r2", "10.0.0.1", "S2")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: UniqueField::Address, .. }));

        let err = store.insert(record("r2", "10.0.0.2", "S1")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { field: UniqueField::SerialNumber, .. }
        ));

        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_sorted_by_hostname() {
        let store = MemoryStore::with_records([
            record("zrh01jp1", "10.0.0.3", "S3"),
            record("ams01jp1", "10.0.0.1", "S1"),
        ])
        .unwrap();

        let hostnames: Vec<_> = store.all().await.unwrap().into_iter().map(|r| r.hostname).collect();
        assert_eq!(hostnames, ["ams01jp1", "zrh01jp1"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::with_records([record("r1", "10.0.0.1", "S1")]).unwrap();

        assert!(store.delete("r1").await.unwrap());
        assert!(!store.delete("r1").await.unwrap());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_inserts_keep_one_record() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(record("r1", &format!("10.0.0.{i}"), &format!("S{i}"))).await
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}
