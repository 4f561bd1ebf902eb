//! netventory-probe: device identity probing
//!
//! A prober turns a management address into the device's identity facts
//! (hostname, chassis model, serial number, software version). The wire
//! protocol is an implementation detail of each vendor strategy.

pub mod error;
pub mod junos;
pub mod session;
pub mod traits;
pub mod types;

pub use error::ProbeError;
pub use junos::JunosProber;
pub use session::{SessionFactory, SshSessionFactory};
pub use traits::DeviceProber;
pub use types::{DeviceFacts, Vendor};
