//! Inventory record type

use chrono::{DateTime, Utc};
use netventory_probe::{DeviceFacts, Vendor};
use serde::{Deserialize, Serialize};

/// One inventoried device
///
/// Records are never updated in place; a changed device is deleted and
/// ingested again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Hostname reported by the device (unique)
    pub hostname: String,
    /// Management address the device was probed on (unique)
    pub address: String,
    /// Chassis model
    pub chassis_model: String,
    /// Chassis serial number (unique)
    pub serial_number: String,
    /// Software version, if reported
    pub software_version: Option<String>,
    /// Classifier label
    pub device_type: String,
    /// Vendor display name
    pub vendor: String,
    /// When the record was built
    pub discovered_at: DateTime<Utc>,
}

impl DeviceRecord {
    /// Build a record from probe facts
    pub fn from_facts(
        address: impl Into<String>,
        facts: DeviceFacts,
        device_type: impl Into<String>,
        vendor: Vendor,
    ) -> Self {
        Self {
            hostname: facts.hostname,
            address: address.into(),
            chassis_model: facts.chassis_model,
            serial_number: facts.serial_number,
            software_version: facts.software_version,
            device_type: device_type.into(),
            vendor: vendor.display_name().to_string(),
            discovered_at: Utc::now(),
        }
    }
}
