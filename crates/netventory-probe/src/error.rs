//! Error types for netventory-probe

use netventory_exec::ExecError;
use thiserror::Error;

/// Why a device could not be probed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Device did not answer, refused the connection or timed out
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// Device rejected the configured credentials
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Session opened but the device's answers could not be used
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

impl From<ExecError> for ProbeError {
    fn from(err: ExecError) -> Self {
        if err.is_unreachable() {
            ProbeError::Unreachable(err.to_string())
        } else if err.is_auth() {
            ProbeError::AuthFailure(err.to_string())
        } else {
            ProbeError::ProtocolError(err.to_string())
        }
    }
}
