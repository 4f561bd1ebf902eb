//! Session factories hand a prober a fresh executor per device

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use netventory_exec::{ConnectionInfo, Credential, ExecError, RemoteExecutor, SshExecutor};

/// Creates one management session per probed address
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Create an executor for `address`; connecting may be deferred to first use
    async fn open(&self, address: &str) -> Result<Arc<dyn RemoteExecutor>, ExecError>;
}

/// Opens SSH sessions with shared credentials
#[derive(Debug, Clone)]
pub struct SshSessionFactory {
    user: String,
    port: u16,
    connect_timeout: Duration,
    credential: Arc<Credential>,
}

impl SshSessionFactory {
    /// Create a factory logging in as `user`
    pub fn new(user: impl Into<String>, credential: Arc<Credential>) -> Self {
        Self {
            user: user.into(),
            port: 22,
            connect_timeout: Duration::from_secs(5),
            credential,
        }
    }

    /// Set SSH port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl SessionFactory for SshSessionFactory {
    async fn open(&self, address: &str) -> Result<Arc<dyn RemoteExecutor>, ExecError> {
        if self.user.is_empty() {
            return Err(ExecError::ConfigError("probe user is empty".to_string()));
        }

        let conn_info = ConnectionInfo::new(address, &self.user)
            .with_port(self.port)
            .with_connect_timeout(self.connect_timeout);

        Ok(Arc::new(SshExecutor::new(conn_info, Arc::clone(&self.credential))))
    }
}
