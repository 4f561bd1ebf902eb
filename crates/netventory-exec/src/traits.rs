//! Remote executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// A session able to run management commands on a device
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run a command, connecting first if needed
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError>;

    /// Run a command, failing with `ExecError::Timeout` if it takes too long
    async fn run_with_timeout(
        &self,
        cmd: &str,
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Close the session. Safe to call when never connected.
    async fn disconnect(&self) -> Result<(), ExecError> {
        Ok(())
    }

    /// Whether a session is currently open
    fn is_connected(&self) -> bool {
        false
    }

    /// Short name of the transport, used in logs
    fn executor_type(&self) -> &'static str;
}
