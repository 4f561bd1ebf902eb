//! Core error types for netventory-core
//!
//! Per-device failures never show up here; they are outcomes, not errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a core operation
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Inventory store cannot be reached; the whole call is abandoned
    #[error("inventory store unavailable: {0}")]
    StoreUnavailable(String),

    /// No inventory record with this hostname
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// A classifier rule failed to compile
    #[error("invalid classifier rule `{pattern}`: {reason}")]
    InvalidRule {
        /// Offending pattern
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Device list could not be read
    #[error("device list error: {0}")]
    SourceError(String),

    /// A pipeline task ended without an outcome
    #[error("ingestion task failed: {0}")]
    TaskFailed(String),
}

/// Insert collisions are settled by the ingestor as `AlreadyPresent`; a
/// `DuplicateKey` reaching this conversion means the backend answered a
/// read or delete with a write error, so it is treated as a broken store.
impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => CoreError::StoreUnavailable(reason),
            duplicate @ StoreError::DuplicateKey { .. } => {
                CoreError::StoreUnavailable(format!("unexpected store reply: {duplicate}"))
            }
        }
    }
}
