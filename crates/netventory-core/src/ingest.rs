//! Bulk ingestion
//!
//! Every address runs through the same pipeline: probe, classify the
//! reported hostname, look it up and insert. Pipelines are independent tokio
//! tasks bounded by a semaphore; the only thing that stops a run early is
//! the store becoming unavailable.

use std::collections::HashSet;
use std::sync::Arc;

use netventory_probe::{DeviceFacts, DeviceProber, ProbeError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, info, instrument, warn};

use crate::classify::Classifier;
use crate::config::IngestConfig;
use crate::error::CoreError;
use crate::record::DeviceRecord;
use crate::report::{IngestStatus, IngestionOutcome, IngestionReport};
use crate::store::{InventoryStore, StoreError};

/// Reason recorded for pipelines stopped by cancellation or the deadline
pub const CANCELLED_REASON: &str = "cancelled";

/// Ingestion engine
///
/// Cheap to clone; clones share the prober, store and classifier.
#[derive(Clone)]
pub struct Ingestor {
    prober: Arc<dyn DeviceProber>,
    store: Arc<dyn InventoryStore>,
    classifier: Arc<Classifier>,
    config: IngestConfig,
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("vendor", &self.prober.vendor())
            .field("store", &self.store.backend())
            .field("classifier_rules", &self.classifier.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Ingestor {
    /// Create an ingestor over an explicit prober and store
    pub fn new(
        prober: Arc<dyn DeviceProber>,
        store: Arc<dyn InventoryStore>,
        classifier: Classifier,
        config: IngestConfig,
    ) -> Self {
        Self {
            prober,
            store,
            classifier: Arc::new(classifier),
            config,
        }
    }

    /// Store records are written to
    #[must_use]
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.store
    }

    /// Limits used for bulk runs
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest a single address
    ///
    /// Probe failures come back as a `ConnectionFailure` outcome, never as
    /// an error.
    ///
    /// # Errors
    /// Returns `CoreError::StoreUnavailable` if the store cannot be read or
    /// written.
    #[instrument(skip(self), fields(vendor = %self.prober.vendor()))]
    pub async fn ingest_one(&self, address: &str) -> Result<IngestionOutcome, CoreError> {
        let probed = self.prober.probe(address).await;
        self.settle(address, probed).await
    }

    /// Ingest every address, without external cancellation
    ///
    /// # Errors
    /// See [`Ingestor::ingest_with_cancel`].
    pub async fn ingest<I, S>(&self, addresses: I) -> Result<IngestionReport, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ingest_with_cancel(addresses, CancellationToken::new())
            .await
    }

    /// Ingest every address concurrently
    ///
    /// Addresses are normalized first (see [`normalize_addresses`]); the
    /// report holds exactly one outcome per remaining address. Once `cancel`
    /// fires, or the configured deadline passes, pipelines still waiting for
    /// a permit or a probe finish as `ConnectionFailure` with reason
    /// `cancelled`. Pipelines already talking to the store run to the end.
    ///
    /// # Errors
    /// Returns `CoreError::StoreUnavailable` if the store fails the initial
    /// ping or any pipeline's read or write; every other pipeline is aborted
    /// and no partial report is returned.
    #[instrument(skip_all, fields(vendor = %self.prober.vendor()))]
    pub async fn ingest_with_cancel<I, S>(
        &self,
        addresses: I,
        cancel: CancellationToken,
    ) -> Result<IngestionReport, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = normalize_addresses(addresses);
        if addresses.is_empty() {
            debug!("nothing to ingest");
            return Ok(IngestionReport::new());
        }

        self.store.ping().await?;

        let total = addresses.len();
        let workers = self.config.workers();
        info!(total, workers, "starting bulk ingestion");

        let cancel = cancel.child_token();
        let _deadline = self.config.deadline().map(|deadline| {
            let token = cancel.clone();
            AbortOnDropHandle::new(tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(?deadline, "ingestion deadline passed, cancelling pending probes");
                token.cancel();
            }))
        });

        let permits = Arc::new(Semaphore::new(workers));
        let mut pipelines = JoinSet::new();
        for address in addresses {
            let this = self.clone();
            let permits = permits.clone();
            let cancel = cancel.clone();
            pipelines.spawn(async move { this.pipeline(address, permits, cancel).await });
        }

        let mut report = IngestionReport::new();
        while let Some(joined) = pipelines.join_next().await {
            let outcome = match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    warn!(error = %e, "aborting bulk ingestion");
                    pipelines.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    pipelines.abort_all();
                    return Err(CoreError::TaskFailed(e.to_string()));
                }
            };
            report.push(outcome);
        }

        info!(
            success = report.bucket(IngestStatus::Success).len(),
            already_present = report.bucket(IngestStatus::AlreadyPresent).len(),
            connection_failure = report.bucket(IngestStatus::ConnectionFailure).len(),
            "bulk ingestion finished"
        );

        Ok(report)
    }

    /// One address inside a bulk run
    async fn pipeline(
        &self,
        address: String,
        permits: Arc<Semaphore>,
        cancel: CancellationToken,
    ) -> Result<IngestionOutcome, CoreError> {
        let probed = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            probed = async {
                let permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| CoreError::TaskFailed(e.to_string()))?;
                Ok::<_, CoreError>((permit, self.prober.probe(&address).await))
            } => Some(probed?),
        };

        let Some((_permit, probed)) = probed else {
            debug!(%address, "pipeline cancelled");
            return Ok(IngestionOutcome::connection_failure(address, CANCELLED_REASON));
        };

        self.settle(&address, probed).await
    }

    /// Turn a probe result into an outcome: failures are reported, facts are
    /// classified, deduplicated and inserted
    async fn settle(
        &self,
        address: &str,
        probed: Result<DeviceFacts, ProbeError>,
    ) -> Result<IngestionOutcome, CoreError> {
        match probed {
            Ok(facts) => self.record(address, facts).await,
            Err(e) => {
                info!(%address, error = %e, "probe failed");
                Ok(IngestionOutcome::connection_failure(address, e.to_string()))
            }
        }
    }

    /// Classify, dedup, then insert
    async fn record(&self, address: &str, facts: DeviceFacts) -> Result<IngestionOutcome, CoreError> {
        let hostname = facts.hostname.clone();
        let device_type = self.classifier.classify(&hostname).to_string();

        if self.store.find_by_hostname(&hostname).await?.is_some() {
            debug!(%address, %hostname, "already in inventory");
            return Ok(IngestionOutcome::already_present(address, hostname));
        }

        let record = DeviceRecord::from_facts(address, facts, device_type, self.prober.vendor());

        match self.store.insert(record).await {
            Ok(()) => {
                info!(%address, %hostname, "device added to inventory");
                Ok(IngestionOutcome::success(address, hostname))
            }
            Err(StoreError::DuplicateKey { field, value }) => {
                debug!(%address, %hostname, %field, %value, "insert collided with existing record");
                Ok(IngestionOutcome::already_present(address, hostname))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Trim addresses, drop empty ones and keep only the first occurrence of
/// each
pub fn normalize_addresses<I, S>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter_map(|address| {
            let address = address.as_ref().trim();
            (!address.is_empty() && seen.insert(address.to_string())).then(|| address.to_string())
        })
        .collect()
}
