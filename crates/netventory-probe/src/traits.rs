//! Device prober trait

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::types::{DeviceFacts, Vendor};

/// Retrieves identity facts from one device
///
/// Implementations hold their own credentials and timeouts. A probe is a
/// single attempt: implementations must not retry.
#[async_trait]
pub trait DeviceProber: Send + Sync {
    /// Query the device at `address`
    async fn probe(&self, address: &str) -> Result<DeviceFacts, ProbeError>;

    /// Vendor this prober speaks to
    fn vendor(&self) -> Vendor;
}
