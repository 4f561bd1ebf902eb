//! Bulk ingestion endpoints

use std::path::{Component, Path as FsPath};
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use netventory_api::{IngestReportResponse, IngestRequest};
use netventory_core::{CoreError, IngestBatch, read_device_file};
use tracing::info;

use crate::api::convert::report_response;
use crate::api::error::AppError;
use crate::state::AppState;

/// Whether `name` is a bare file name with no directory parts
fn is_plain_file_name(name: &str) -> bool {
    let mut components = FsPath::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

async fn run_batch(state: &AppState, addresses: Vec<String>) -> Result<IngestReportResponse, AppError> {
    let report = state.inventory.ask(IngestBatch { addresses }).await?;
    Ok(report_response(&report))
}

/// Ingest every device listed in a file under the configured devices dir
///
/// # Errors
/// Returns 400 for names with path components, 404 if the file does not
/// exist and 503 if the store is unavailable
pub async fn populate_from_file(
    State(state): State<Arc<AppState>>,
    Path(device_filename): Path<String>,
) -> Result<Json<IngestReportResponse>, AppError> {
    if !is_plain_file_name(&device_filename) {
        return Err(AppError::bad_request("device list must be a plain file name"));
    }

    let path = state.config.daemon.devices_dir.join(&device_filename);
    let addresses = read_device_file(&path).await.map_err(|e| match e {
        CoreError::SourceError(_) if !path.exists() => {
            AppError::not_found(format!("Device list {device_filename} not found"))
        }
        other => other.into(),
    })?;

    info!(file = %device_filename, count = addresses.len(), "populating from device list");
    Ok(Json(run_batch(&state, addresses).await?))
}

/// Ingest the addresses in the request body
///
/// # Errors
/// Returns 503 if the store is unavailable
pub async fn populate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<IngestReportResponse>, AppError> {
    info!(count = req.addresses.len(), "populating from request");
    Ok(Json(run_batch(&state, req.addresses).await?))
}
