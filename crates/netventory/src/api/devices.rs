//! Device endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kameo::error::SendError;
use netventory_api::{AddDeviceRequest, DeviceResponse, StatusResponse};
use netventory_core::{CoreError, DeleteDevice, GetDevice, IngestDevice, IngestStatus, ListDevices};
use tracing::{info, warn};

use crate::api::convert::device_response;
use crate::api::error::AppError;
use crate::state::AppState;

/// List every device, ordered by type then hostname
///
/// # Errors
/// Returns `AppError` if the store is unavailable
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceResponse>>, AppError> {
    let mut devices = state.inventory.ask(ListDevices).await?;
    devices.sort_by(|a, b| {
        a.device_type
            .cmp(&b.device_type)
            .then_with(|| a.hostname.cmp(&b.hostname))
    });

    Ok(Json(devices.into_iter().map(device_response).collect()))
}

/// Get one device by hostname
///
/// # Errors
/// Returns 404 if no device has this hostname
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(hostname): Path<String>,
) -> Result<Json<DeviceResponse>, AppError> {
    let device = state
        .inventory
        .ask(GetDevice { hostname })
        .await
        .map_err(|e| match e {
            SendError::HandlerError(CoreError::DeviceNotFound(_)) => {
                AppError::not_found("Device not found")
            }
            other => other.into(),
        })?;

    Ok(Json(device_response(device)))
}

/// Probe one address and add it to the inventory
///
/// # Errors
/// Returns 409 if the device is already present and 502 if it cannot be
/// reached
pub async fn add_device(
    State(state): State<Arc<AppState>>,
    Path(hostname): Path<String>,
    Json(req): Json<AddDeviceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.ip.trim().is_empty() {
        return Err(AppError::bad_request("ip must not be empty"));
    }

    let outcome = state
        .inventory
        .ask(IngestDevice { address: req.ip })
        .await?;

    if let Some(reported) = outcome.hostname.as_deref()
        && reported != hostname
    {
        warn!(requested = %hostname, %reported, address = %outcome.address, "device reports a different hostname");
    }

    match outcome.status {
        IngestStatus::Success => {
            info!(%hostname, address = %outcome.address, "device added via API");
            Ok(Json(StatusResponse {
                status: format!("DB was populated for {hostname}"),
            }))
        }
        IngestStatus::AlreadyPresent => Err(AppError::conflict("Device is present in DB")),
        IngestStatus::ConnectionFailure => Err(AppError::bad_gateway("Cannot connect to device")),
    }
}

/// Remove one device by hostname
///
/// # Errors
/// Returns 404 if no device has this hostname
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Path(hostname): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    state
        .inventory
        .ask(DeleteDevice {
            hostname: hostname.clone(),
        })
        .await
        .map_err(|e| match e {
            SendError::HandlerError(CoreError::DeviceNotFound(_)) => {
                AppError::not_found("Device is NOT present in DB")
            }
            other => other.into(),
        })?;

    Ok(Json(StatusResponse {
        status: format!("DB entry was cleared for {hostname}"),
    }))
}
