//! Hostname-based device classification
//!
//! Rules are tested in order and the first match wins. Order matters: the lab
//! site prefix overlaps every role pattern, so it is tested first and a lab
//! device is always reported as such whatever its role code.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::ClassifierRule;
use crate::error::CoreError;

/// Label returned when no rule matches
pub const UNKNOWN_DEVICE_TYPE: &str = "N/A";

/// Built-in Juniper naming convention: `<site>j<role><index>`
const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"^wrcsmalbj[48fnlpksim3tx]\w*$", "LAB device"),
    (r"^\w+j[4928f][1-9]$", "MPLS PE"),
    (r"^\w+jn[1-9]$", "MPLS PE/BGP RR"),
    (r"^\w+j[pl][1-9]$", "MPLS P"),
    (r"^\w+j[kb][1-9]$", "Agg SW"),
    (r"^\w+j[im3tx][1-9]$", "Mngmt SW"),
    (r"^\w+js[1-9]$", "Mngmt FW"),
];

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::builtin);

/// Classify `hostname` with the built-in rules
#[must_use]
pub fn classify(hostname: &str) -> &'static str {
    DEFAULT_CLASSIFIER.classify(hostname)
}

/// Ordered list of compiled (pattern, label) rules
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Regex, String)>,
}

impl Classifier {
    /// Compile rules in the given order
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` for the first pattern that does not compile.
    pub fn new(rules: &[ClassifierRule]) -> Result<Self, CoreError> {
        let compiled = rules
            .iter()
            .map(|rule| compile(&rule.pattern).map(|re| (re, rule.label.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    /// Classifier using the built-in Juniper naming rules
    #[must_use]
    pub fn builtin() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(pattern, label)| compile(pattern).ok().map(|re| (re, (*label).to_string())))
            .collect();
        Self { rules }
    }

    /// Configured rules, or the built-in ones when `rules` is empty
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` if a configured pattern does not compile.
    pub fn from_config(rules: &[ClassifierRule]) -> Result<Self, CoreError> {
        if rules.is_empty() {
            Ok(Self::builtin())
        } else {
            Self::new(rules)
        }
    }

    /// Device type for `hostname`, `N/A` when no rule matches
    #[must_use]
    pub fn classify(&self, hostname: &str) -> &str {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(hostname))
            .map_or(UNKNOWN_DEVICE_TYPE, |(_, label)| label.as_str())
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules (everything classifies as `N/A`)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compile(pattern: &str) -> Result<Regex, CoreError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| CoreError::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
