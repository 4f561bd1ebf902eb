//! Response types for the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Inventory record as served over HTTP
///
/// Field names follow the historical inventory API so existing consumers
/// keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeviceResponse {
    pub hostname: String,
    pub ip: String,
    pub chassis: String,
    pub serialnum: String,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub device_type: String,
    pub vendor: String,
    pub discovered_at: DateTime<Utc>,
}

/// One address in an ingestion report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportEntry {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of a bulk or single ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestReportResponse {
    #[serde(rename = "success", default)]
    pub success: Vec<ReportEntry>,
    #[serde(rename = "Present in DB", default)]
    pub already_present: Vec<ReportEntry>,
    #[serde(rename = "Connection failure", default)]
    pub connection_failure: Vec<ReportEntry>,
}

impl IngestReportResponse {
    #[must_use]
    pub fn total(&self) -> usize {
        self.success.len() + self.already_present.len() + self.connection_failure.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
