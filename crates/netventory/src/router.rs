//! HTTP router configuration

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::{devices, populate, system};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // System endpoints
        .route("/health", get(system::health))
        .route("/api-docs/openapi.json", get(system::openapi))
        // Devices
        .route("/api/devices", get(devices::list_devices))
        .route("/api/devices/{hostname}", get(devices::get_device))
        .route("/api/add/{hostname}", post(devices::add_device))
        .route("/api/delete/{hostname}", delete(devices::delete_device))
        // Bulk ingestion
        .route("/api/populatedb/{device_filename}", get(populate::populate_from_file))
        .route("/api/populate", post(populate::populate))
        // State
        .with_state(state)
}
