//! Message types for actor communication
//!
//! Message handlers are implemented in their respective actor modules.

/// Ingest every address in the list
#[derive(Debug, Clone)]
pub struct IngestBatch {
    /// Addresses to probe
    pub addresses: Vec<String>,
}

/// Ingest one address
#[derive(Debug, Clone)]
pub struct IngestDevice {
    /// Address to probe
    pub address: String,
}

/// List all inventory records
#[derive(Debug, Clone, Copy)]
pub struct ListDevices;

/// Fetch one record by hostname
#[derive(Debug, Clone)]
pub struct GetDevice {
    /// Hostname to look up
    pub hostname: String,
}

/// Remove one record by hostname
#[derive(Debug, Clone)]
pub struct DeleteDevice {
    /// Hostname to remove
    pub hostname: String,
}
