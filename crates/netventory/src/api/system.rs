//! System endpoints

use axum::Json;
use netventory_api::{ApiDoc, HealthResponse};
use utoipa::OpenApi;

/// Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// OpenAPI document of the shared API schemas
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
