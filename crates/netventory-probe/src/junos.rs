//! Junos prober
//!
//! Logs in over SSH and asks the Junos CLI for `show version` and
//! `show chassis hardware` in JSON form. The Junos JSON encoding wraps every
//! element in a one-item array and every leaf in `{"data": ...}`; devices with
//! several routing engines nest the same documents under
//! `multi-routing-engine-results`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use netventory_exec::RemoteExecutor;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ProbeError;
use crate::session::SessionFactory;
use crate::traits::DeviceProber;
use crate::types::{DeviceFacts, Vendor};

const SHOW_VERSION: &str = "show version | display json";
const SHOW_CHASSIS: &str = "show chassis hardware | display json";

/// Juniper identity prober
pub struct JunosProber {
    sessions: Arc<dyn SessionFactory>,
    command_timeout: Duration,
}

impl JunosProber {
    /// Create a prober opening sessions through `sessions`
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            sessions,
            command_timeout: Duration::from_secs(30),
        }
    }

    /// Set per-command timeout
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    async fn collect(&self, executor: &dyn RemoteExecutor) -> Result<DeviceFacts, ProbeError> {
        let version = self.run_json(executor, SHOW_VERSION).await?;
        let chassis = self.run_json(executor, SHOW_CHASSIS).await?;
        facts_from_json(&version, &chassis)
    }

    async fn run_json(&self, executor: &dyn RemoteExecutor, cmd: &str) -> Result<Value, ProbeError> {
        let result = executor.run_with_timeout(cmd, self.command_timeout).await?;

        if !result.success() {
            return Err(ProbeError::ProtocolError(format!(
                "`{cmd}` failed: {}",
                result.failure_message()
            )));
        }

        parse_cli_json(&result.stdout)
            .map_err(|e| ProbeError::ProtocolError(format!("`{cmd}` returned bad JSON: {e}")))
    }
}

#[async_trait]
impl DeviceProber for JunosProber {
    #[instrument(skip(self))]
    async fn probe(&self, address: &str) -> Result<DeviceFacts, ProbeError> {
        let executor = self.sessions.open(address).await?;

        let facts = self.collect(executor.as_ref()).await;

        if let Err(e) = executor.disconnect().await {
            warn!(address, error = %e, "failed to close session");
        }

        let facts = facts?;
        debug!(
            address,
            hostname = %facts.hostname,
            model = %facts.chassis_model,
            "probe completed"
        );
        Ok(facts)
    }

    fn vendor(&self) -> Vendor {
        Vendor::Juniper
    }
}

/// Parse the first JSON document in CLI output, ignoring banners before it
/// and prompt residue such as `{master}` after it
fn parse_cli_json(output: &str) -> Result<Value, serde_json::Error> {
    let start = output.find('{').unwrap_or(0);
    let mut stream = serde_json::Deserializer::from_str(&output[start..]).into_iter::<Value>();
    match stream.next() {
        Some(value) => value,
        None => serde_json::from_str(""),
    }
}

/// Build facts from `show version` and `show chassis hardware` documents
///
/// # Errors
/// Returns `ProbeError::ProtocolError` when hostname, model or serial number is missing.
pub fn facts_from_json(version: &Value, chassis: &Value) -> Result<DeviceFacts, ProbeError> {
    let software = section(version, "software-information").ok_or_else(|| {
        ProbeError::ProtocolError("missing software-information in show version".to_string())
    })?;
    let inventory = section(chassis, "chassis-inventory")
        .and_then(|inv| first(inv, "chassis"))
        .ok_or_else(|| {
            ProbeError::ProtocolError("missing chassis in show chassis hardware".to_string())
        })?;

    let hostname = leaf(software, "host-name")
        .ok_or_else(|| ProbeError::ProtocolError("device reported no hostname".to_string()))?;

    let chassis_model = leaf(software, "product-model")
        .or_else(|| leaf(inventory, "description"))
        .map(|m| m.to_uppercase())
        .ok_or_else(|| ProbeError::ProtocolError("device reported no model".to_string()))?;

    let serial_number = leaf(inventory, "serial-number")
        .ok_or_else(|| ProbeError::ProtocolError("device reported no serial number".to_string()))?;

    let software_version =
        leaf(software, "junos-version").or_else(|| package_version(software, "junos"));

    Ok(DeviceFacts {
        hostname,
        chassis_model,
        serial_number,
        software_version,
    })
}

/// First element of the array stored under `key`
fn first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key)?.as_array()?.first()
}

/// Text of the leaf stored under `key`, trimmed, `None` when blank
fn leaf(value: &Value, key: &str) -> Option<String> {
    let text = first(value, key)?.get("data")?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Top-level section, or the one reported by the first routing engine
fn section<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    first(doc, key).or_else(|| {
        let results = first(doc, "multi-routing-engine-results")?;
        let item = first(results, "multi-routing-engine-item")?;
        first(item, key)
    })
}

/// Release from a package comment like `JUNOS Base OS boot [12.3R6.6]`
fn package_version(software: &Value, package: &str) -> Option<String> {
    software
        .get("package-information")?
        .as_array()?
        .iter()
        .filter(|pkg| leaf(pkg, "name").as_deref() == Some(package))
        .find_map(|pkg| {
            let comment = leaf(pkg, "comment")?;
            let open = comment.find('[')?;
            let close = comment[open..].find(']')? + open;
            Some(comment[open + 1..close].to_string())
        })
}
