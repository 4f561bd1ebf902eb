//! Configuration types for ingestion and classification

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bulk ingestion limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum number of devices probed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Overall deadline for one bulk run in seconds; pending probes are
    /// reported as connection failures once it passes
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_concurrency() -> usize {
    16
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            deadline_secs: None,
        }
    }
}

impl IngestConfig {
    /// Deadline as a `Duration`
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Concurrency clamped to at least one worker
    #[must_use]
    pub fn workers(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// One hostname classification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    /// Regular expression matched case-insensitively against the hostname
    pub pattern: String,
    /// Device type assigned on match
    pub label: String,
}

impl ClassifierRule {
    /// Create a rule
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Classifier section of the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ordered rules; empty means the built-in Juniper naming rules
    #[serde(default)]
    pub rules: Vec<ClassifierRule>,
}
