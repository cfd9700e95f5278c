//! JSON output format for distribution comparisons
//!
//! `--format json`: one document with every set summary, every load
//! failure and one record per matched model group.

use crate::classifier::ClassificationResult;
use crate::error::AnalysisError;
use crate::report::ReportSink;
use crate::sample_store::{Group, LoadFailure};
use crate::stats::SampleSummary;
use serde::Serialize;
use std::path::Path;

/// One loaded sample set
#[derive(Debug, Clone, Serialize)]
pub struct JsonSampleSet {
    pub group: Group,
    /// Position within its group
    pub index: usize,
    pub source: String,
    /// Descriptive statistics (absent for a file without rows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SampleSummary>,
}

/// A file that did not load
#[derive(Debug, Clone, Serialize)]
pub struct JsonLoadFailure {
    pub group: Group,
    pub path: String,
    pub error: String,
}

/// Classification of one model group against data group 0
#[derive(Debug, Clone, Serialize)]
pub struct JsonMatch {
    /// Model group index
    pub group: usize,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationResult>,
    /// Why the group could not be classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub sets: Vec<JsonSampleSet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JsonLoadFailure>,
    pub matches: Vec<JsonMatch>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "distview-json-v1".to_string(),
            sets: Vec::new(),
            failures: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for JsonOutput {
    fn add_set(
        &mut self,
        group: Group,
        index: usize,
        source: &Path,
        summary: Option<&SampleSummary>,
    ) {
        self.sets.push(JsonSampleSet {
            group,
            index,
            source: source.display().to_string(),
            summary: summary.cloned(),
        });
    }

    fn add_failure(&mut self, group: Group, failure: &LoadFailure) {
        self.failures.push(JsonLoadFailure {
            group,
            path: failure.path.display().to_string(),
            error: failure.error.to_string(),
        });
    }

    fn publish(&mut self, group: usize, source: &Path, result: &ClassificationResult) {
        self.matches.push(JsonMatch {
            group,
            source: source.display().to_string(),
            result: Some(result.clone()),
            error: None,
        });
    }

    fn reject(&mut self, group: usize, source: &Path, error: &AnalysisError) {
        self.matches.push(JsonMatch {
            group,
            source: source.display().to_string(),
            result: None,
            error: Some(error.to_string()),
        });
    }

    fn render(&self) -> anyhow::Result<String> {
        self.to_json()
    }
}
