//! netventory-core: ingestion engine and inventory storage
//!
//! Probes device addresses, classifies them by hostname, deduplicates
//! against the inventory store and aggregates a per-run report. The
//! `InventoryActor` wraps the engine for the daemon.

pub mod actor;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod message;
pub mod record;
pub mod report;
pub mod source;
pub mod store;

pub use actor::{InventoryActor, InventoryActorArgs};
pub use classify::{Classifier, UNKNOWN_DEVICE_TYPE, classify};
pub use config::{ClassifierConfig, ClassifierRule, IngestConfig};
pub use error::CoreError;
pub use ingest::{CANCELLED_REASON, Ingestor, normalize_addresses};
pub use message::{DeleteDevice, GetDevice, IngestBatch, IngestDevice, ListDevices};
pub use record::DeviceRecord;
pub use report::{IngestStatus, IngestionOutcome, IngestionReport};
pub use source::{parse_device_list, read_device_file};
pub use store::{InventoryStore, JsonFileStore, MemoryStore, StoreError, UniqueField};
pub use tokio_util::sync::CancellationToken;
