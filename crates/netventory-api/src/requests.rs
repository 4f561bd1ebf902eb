//! Request types for the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/add/{hostname}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddDeviceRequest {
    pub ip: String,
}

/// Body of `POST /api/populate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub addresses: Vec<String>,
}
