//! Probe result types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity facts reported by a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFacts {
    /// Configured hostname
    pub hostname: String,
    /// Chassis model (e.g. `MX480`)
    pub chassis_model: String,
    /// Chassis serial number
    pub serial_number: String,
    /// Running software version, when the device reports one
    pub software_version: Option<String>,
}

/// Device vendor, selects the probing strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Juniper Networks (Junos)
    #[default]
    Juniper,
}

impl Vendor {
    /// Vendor name stored with each inventory record
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Juniper => "Juniper Networks",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
