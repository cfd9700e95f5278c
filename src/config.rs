//! Viewer configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Every field has a default so a file only needs the
//! keys it changes:
//!
//! ```toml
//! model_pattern = "ExpRes/local_*.csv"
//! data_pattern = "ExpRes/remote_*.csv"
//! delay_type = 5
//! sample_rate = 20.0
//! clip_percentile = true
//!
//! [classifier]
//! resolution = 200
//! ```

use crate::classifier::ClassifierConfig;
use crate::histogram::DEFAULT_DOMAIN_BOUND;
use crate::sample_store::MAX_DELAY_SELECTOR;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one viewer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Glob selecting the model (baseline) result files
    pub model_pattern: String,

    /// Glob selecting the data (candidate) result files
    pub data_pattern: String,

    /// Delay type selector, 0..=5 (5 = column 3 + column 4)
    pub delay_type: usize,

    /// Percentage of each file drawn for charts and matching, in (0, 100]
    pub sample_rate: f64,

    /// Number of 1000us histogram buckets
    pub domain_bound: usize,

    /// Clip the histogram domain at the pooled 99.9th percentile
    pub clip_percentile: bool,

    /// Seed for repeatable subsampling; entropy when absent
    pub seed: Option<u64>,

    pub classifier: ClassifierConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_pattern: "ExpRes/model*.csv".to_string(),
            data_pattern: "ExpRes/data*.csv".to_string(),
            delay_type: MAX_DELAY_SELECTOR,
            sample_rate: 100.0,
            domain_bound: DEFAULT_DOMAIN_BOUND,
            clip_percentile: false,
            seed: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ViewerConfig =
            toml::from_str(content).context("Failed to parse viewer configuration")?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.delay_type > MAX_DELAY_SELECTOR {
            return Err(format!(
                "delay_type must be in 0..={}, got {}",
                MAX_DELAY_SELECTOR, self.delay_type
            ));
        }

        if self.sample_rate.is_nan() || self.sample_rate <= 0.0 || self.sample_rate > 100.0 {
            return Err(format!(
                "sample_rate must be in (0, 100], got {}",
                self.sample_rate
            ));
        }

        if self.domain_bound == 0 {
            return Err("domain_bound must be >= 1, got 0".to_string());
        }

        if self.model_pattern.is_empty() || self.data_pattern.is_empty() {
            return Err("model_pattern and data_pattern must not be empty".to_string());
        }

        self.classifier.validate()
    }
}
