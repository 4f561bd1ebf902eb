//! Error types for netventory-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to a device over SSH
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// TCP connect or SSH handshake failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Device rejected the configured credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Connect or command exceeded its deadline
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Channel-level I/O error after the session was established
    #[error("I/O error: {0}")]
    IoError(String),

    /// Connection not established
    #[error("not connected")]
    NotConnected,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl ExecError {
    /// Whether the device could not be reached at all
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ExecError::ConnectionFailed(_) | ExecError::Timeout { .. }
        )
    }

    /// Whether the device refused our credentials
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, ExecError::AuthenticationFailed(_))
    }
}
