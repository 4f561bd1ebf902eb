//! Ingestion outcomes and the aggregated report

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result class of one ingestion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IngestStatus {
    /// New record stored
    Success,
    /// Device already in inventory, nothing written
    AlreadyPresent,
    /// Device could not be probed (unreachable, auth, protocol, cancelled)
    ConnectionFailure,
}

impl IngestStatus {
    /// All statuses in report order
    pub const ALL: [IngestStatus; 3] = [
        IngestStatus::Success,
        IngestStatus::AlreadyPresent,
        IngestStatus::ConnectionFailure,
    ];

    /// Bucket name used in JSON reports
    #[must_use]
    pub fn bucket_name(&self) -> &'static str {
        match self {
            IngestStatus::Success => "success",
            IngestStatus::AlreadyPresent => "Present in DB",
            IngestStatus::ConnectionFailure => "Connection failure",
        }
    }
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket_name())
    }
}

/// Result of ingesting one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOutcome {
    /// Submitted address
    pub address: String,
    /// Result class
    pub status: IngestStatus,
    /// Hostname reported by the device; absent for connection failures
    pub hostname: Option<String>,
    /// Why the device could not be probed
    pub reason: Option<String>,
}

impl IngestionOutcome {
    /// New record stored for `hostname`
    pub fn success(address: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: IngestStatus::Success,
            hostname: Some(hostname.into()),
            reason: None,
        }
    }

    /// `hostname` was already in inventory
    pub fn already_present(address: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: IngestStatus::AlreadyPresent,
            hostname: Some(hostname.into()),
            reason: None,
        }
    }

    /// Device could not be probed
    pub fn connection_failure(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: IngestStatus::ConnectionFailure,
            hostname: None,
            reason: Some(reason.into()),
        }
    }
}

/// Outcomes of one bulk run grouped by status
///
/// Within a bucket, outcomes appear in completion order, not submission
/// order. Callers that need a stable order must sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    success: Vec<IngestionOutcome>,
    already_present: Vec<IngestionOutcome>,
    connection_failure: Vec<IngestionOutcome>,
}

impl IngestionReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome in its status bucket
    pub fn push(&mut self, outcome: IngestionOutcome) {
        let bucket = match outcome.status {
            IngestStatus::Success => &mut self.success,
            IngestStatus::AlreadyPresent => &mut self.already_present,
            IngestStatus::ConnectionFailure => &mut self.connection_failure,
        };
        bucket.push(outcome);
    }

    /// Outcomes with `status`
    #[must_use]
    pub fn bucket(&self, status: IngestStatus) -> &[IngestionOutcome] {
        match status {
            IngestStatus::Success => &self.success,
            IngestStatus::AlreadyPresent => &self.already_present,
            IngestStatus::ConnectionFailure => &self.connection_failure,
        }
    }

    /// Every outcome, bucket by bucket
    pub fn outcomes(&self) -> impl Iterator<Item = &IngestionOutcome> {
        IngestStatus::ALL
            .into_iter()
            .flat_map(move |status| self.bucket(status).iter())
    }

    /// Outcome recorded for `address`
    #[must_use]
    pub fn outcome_for(&self, address: &str) -> Option<&IngestionOutcome> {
        self.outcomes().find(|o| o.address == address)
    }

    /// Total number of outcomes
    #[must_use]
    pub fn len(&self) -> usize {
        self.success.len() + self.already_present.len() + self.connection_failure.len()
    }

    /// Whether the report has no outcomes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<IngestionOutcome> for IngestionReport {
    fn from_iter<I: IntoIterator<Item = IngestionOutcome>>(iter: I) -> Self {
        let mut report = Self::new();
        for outcome in iter {
            report.push(outcome);
        }
        report
    }
}
