//! netventory-api: Shared API types and schemas
//!
//! Request/response types and the OpenAPI document shared by the daemon,
//! the HTTP client and the CLI.

pub mod requests;
pub mod responses;

use utoipa::OpenApi;

pub use requests::{AddDeviceRequest, IngestRequest};
pub use responses::{
    DeviceResponse, ErrorResponse, HealthResponse, IngestReportResponse, ReportEntry,
    StatusResponse,
};

/// OpenAPI document for the shared schemas
#[derive(OpenApi)]
#[openapi(
    info(title = "netventory", description = "Network device inventory API"),
    components(schemas(
        AddDeviceRequest,
        IngestRequest,
        HealthResponse,
        DeviceResponse,
        ReportEntry,
        IngestReportResponse,
        StatusResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;
