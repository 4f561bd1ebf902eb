//! Inventory storage
//!
//! The store is the only place uniqueness is enforced. Hostname, address
//! and serial number are each unique across the inventory; an insert that
//! would duplicate any of them is rejected with [`StoreError::DuplicateKey`]
//! and changes nothing.

mod json;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::DeviceRecord;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert would duplicate a unique field
    #[error("duplicate {field}: {value}")]
    DuplicateKey {
        /// Unique field that collided
        field: UniqueField,
        /// Colliding value
        value: String,
    },

    /// Store could not be read or written
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Fields with a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// Device hostname
    Hostname,
    /// Management address
    Address,
    /// Chassis serial number
    SerialNumber,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UniqueField::Hostname => "hostname",
            UniqueField::Address => "address",
            UniqueField::SerialNumber => "serial number",
        };
        f.write_str(name)
    }
}

/// Persistent set of device records
///
/// Implementations must be safe to share between concurrent ingestion
/// tasks. `insert` has to check and write atomically with respect to
/// other inserts, so two racing inserts of the same hostname leave exactly
/// one record and one `DuplicateKey`.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Record with this hostname, if any
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<DeviceRecord>, StoreError>;

    /// Add a new record
    ///
    /// # Errors
    /// `DuplicateKey` if hostname, address or serial number is already
    /// present; `Unavailable` if the write fails.
    async fn insert(&self, record: DeviceRecord) -> Result<(), StoreError>;

    /// All records, ordered by hostname
    async fn all(&self) -> Result<Vec<DeviceRecord>, StoreError>;

    /// Remove the record with this hostname; `false` if there was none
    async fn delete(&self, hostname: &str) -> Result<bool, StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Serialized inventory contents, keyed by hostname
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct InventoryData {
    /// Document format version
    pub version: u32,
    /// Records keyed by hostname
    pub devices: BTreeMap<String, DeviceRecord>,
}

impl InventoryData {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            devices: BTreeMap::new(),
        }
    }

    /// First unique field of `record` that is already taken
    pub fn check_unique(&self, record: &DeviceRecord) -> Result<(), StoreError> {
        if self.devices.contains_key(&record.hostname) {
            return Err(StoreError::DuplicateKey {
                field: UniqueField::Hostname,
                value: record.hostname.clone(),
            });
        }
        if self.devices.values().any(|d| d.address == record.address) {
            return Err(StoreError::DuplicateKey {
                field: UniqueField::Address,
                value: record.address.clone(),
            });
        }
        if self
            .devices
            .values()
            .any(|d| d.serial_number == record.serial_number)
        {
            return Err(StoreError::DuplicateKey {
                field: UniqueField::SerialNumber,
                value: record.serial_number.clone(),
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, record: DeviceRecord) -> Result<(), StoreError> {
        self.check_unique(&record)?;
        self.devices.insert(record.hostname.clone(), record);
        Ok(())
    }

    pub fn records(&self) -> Vec<DeviceRecord> {
        self.devices.values().cloned().collect()
    }
}
