//! JSON file store
//!
//! The whole inventory is one versioned JSON document. Every write replaces
//! the file through a temporary sibling and a rename, so readers never see
//! a half-written document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{InventoryData, InventoryStore, StoreError};
use crate::record::DeviceRecord;

/// Store persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<InventoryData>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty inventory if the file
    /// does not exist yet
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the file exists but cannot be
    /// read or parsed, if its format version is newer than supported, or if
    /// two entries share a hostname, address or serial number.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse(&path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => InventoryData::new(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), devices = data.devices.len(), "opened inventory file");

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// File backing this store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, data: &InventoryData) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(data)
            .map_err(|e| StoreError::Unavailable(format!("cannot serialize inventory: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await.map_err(|e| {
            StoreError::Unavailable(format!("cannot write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::Unavailable(format!("cannot replace {}: {e}", self.path.display()))
        })
    }
}

fn parse(path: &Path, content: &str) -> Result<InventoryData, StoreError> {
    let data: InventoryData = serde_json::from_str(content)
        .map_err(|e| StoreError::Unavailable(format!("cannot parse {}: {e}", path.display())))?;

    if data.version > InventoryData::CURRENT_VERSION {
        return Err(StoreError::Unavailable(format!(
            "{} has format version {}, newest supported is {}",
            path.display(),
            data.version,
            InventoryData::CURRENT_VERSION
        )));
    }

    let mut checked = InventoryData {
        version: data.version,
        devices: BTreeMap::new(),
    };
    for (key, record) in data.devices {
        if key != record.hostname {
            return Err(StoreError::Unavailable(format!(
                "{}: entry `{key}` holds device `{}`",
                path.display(),
                record.hostname
            )));
        }
        checked.insert(record).map_err(|e| {
            StoreError::Unavailable(format!("{}: {e}", path.display()))
        })?;
    }
    Ok(checked)
}

#[async_trait]
impl InventoryStore for JsonFileStore {
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(self.data.lock().await.devices.get(hostname).cloned())
    }

    async fn insert(&self, record: DeviceRecord) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let hostname = record.hostname.clone();
        data.insert(record)?;

        if let Err(e) = self.save(&data).await {
            warn!(%hostname, error = %e, "rolling back insert");
            data.devices.remove(&hostname);
            return Err(e);
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        Ok(self.data.lock().await.records())
    }

    async fn delete(&self, hostname: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        let Some(removed) = data.devices.remove(hostname) else {
            return Ok(false);
        };

        if let Err(e) = self.save(&data).await {
            warn!(%hostname, error = %e, "rolling back delete");
            data.devices.insert(removed.hostname.clone(), removed);
            return Err(e);
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let meta = tokio::fs::metadata(dir)
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", dir.display())))?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                dir.display()
            )))
        }
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}
