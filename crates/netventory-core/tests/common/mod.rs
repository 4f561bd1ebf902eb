//! Shared test doubles

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use netventory_core::{DeviceRecord, InventoryStore, MemoryStore, StoreError};
use netventory_probe::{DeviceFacts, DeviceProber, ProbeError, Vendor};

/// What the mock device at an address does when probed
#[derive(Clone)]
pub enum Behavior {
    Facts(DeviceFacts),
    Slow(DeviceFacts, Duration),
    Fail(ProbeError),
    Hang,
}

/// Prober answering from a fixed address table
#[derive(Default)]
pub struct MockProber {
    devices: HashMap<String, Behavior>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, address: &str, hostname: &str, serial: &str) -> Self {
        self.devices
            .insert(address.to_string(), Behavior::Facts(facts(hostname, serial)));
        self
    }

    pub fn with_behavior(mut self, address: &str, behavior: Behavior) -> Self {
        self.devices.insert(address.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceProber for MockProber {
    async fn probe(&self, address: &str) -> Result<DeviceFacts, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.devices.get(address).cloned() {
            Some(Behavior::Facts(facts)) => {
                tokio::task::yield_now().await;
                Ok(facts)
            }
            Some(Behavior::Slow(facts, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(facts)
            }
            Some(Behavior::Fail(e)) => Err(e),
            Some(Behavior::Hang) => std::future::pending().await,
            None => Err(ProbeError::Unreachable(format!("{address}: no route to host"))),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn vendor(&self) -> Vendor {
        Vendor::Juniper
    }
}

pub fn facts(hostname: &str, serial: &str) -> DeviceFacts {
    DeviceFacts {
        hostname: hostname.to_string(),
        chassis_model: "MX480".to_string(),
        serial_number: serial.to_string(),
        software_version: Some("21.4R3-S5".to_string()),
    }
}

pub fn record(hostname: &str, address: &str, serial: &str) -> DeviceRecord {
    DeviceRecord {
        hostname: hostname.to_string(),
        address: address.to_string(),
        chassis_model: "MX480".to_string(),
        serial_number: serial.to_string(),
        software_version: None,
        device_type: "N/A".to_string(),
        vendor: "Juniper Networks".to_string(),
        discovered_at: Utc::now(),
    }
}

/// Store that answers pings but fails every read and write, or fails
/// everything when `down` is set
pub struct FailingStore {
    pub down: bool,
}

#[async_trait]
impl InventoryStore for FailingStore {
    async fn find_by_hostname(&self, _hostname: &str) -> Result<Option<DeviceRecord>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn insert(&self, _record: DeviceRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn delete(&self, _hostname: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.down {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Store whose hostname lookup never finds anything, so every collision
/// has to be caught by `insert`
pub struct BlindLookupStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl InventoryStore for BlindLookupStore {
    async fn find_by_hostname(&self, _hostname: &str) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, record: DeviceRecord) -> Result<(), StoreError> {
        self.inner.insert(record).await
    }

    async fn all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        self.inner.all().await
    }

    async fn delete(&self, hostname: &str) -> Result<bool, StoreError> {
        self.inner.delete(hostname).await
    }

    fn backend(&self) -> &'static str {
        "blind"
    }
}
