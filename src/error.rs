//! Error taxonomy for loading, sampling, binning and classification

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classifier stage at which a data set turned out to be unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateStage {
    /// Outlier trimming left an empty set (or a set was empty to begin with)
    Trim,
    /// `tp + fn == 0` at every sweep step
    Sensitivity,
    /// `tn + fp == 0` at every sweep step
    Specificity,
}

impl fmt::Display for DegenerateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegenerateStage::Trim => "trim",
            DegenerateStage::Sensitivity => "sensitivity",
            DegenerateStage::Specificity => "specificity",
        };
        f.write_str(name)
    }
}

/// Errors raised by the distribution analysis pipeline
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to load {}: line {line}: {reason}", path.display())]
    FileLoad {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid delay type {0} (expected 0..=5)")]
    InvalidDelayType(usize),

    #[error("Invalid sample rate {0}% (expected a value in (0, 100])")]
    InvalidSampleRate(f64),

    #[error("Invalid sample size: requested {requested}, population has {available}")]
    InvalidSampleSize { requested: usize, available: usize },

    #[error("Cannot compute a percentile over an empty population")]
    EmptyPopulation,

    #[error("Degenerate data set: {stage} cannot be computed")]
    DegenerateDataSet { stage: DegenerateStage },

    #[error("Statistics failed: {0}")]
    Statistics(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_load_message_names_file() {
        let err = AnalysisError::FileLoad {
            path: PathBuf::from("ExpRes/run1.csv"),
            line: 7,
            reason: "invalid digit found in string".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ExpRes/run1.csv"));
        assert!(msg.contains("line 7"));
    }

    #[test]
    fn test_degenerate_message_names_stage() {
        let err = AnalysisError::DegenerateDataSet {
            stage: DegenerateStage::Specificity,
        };
        assert_eq!(
            err.to_string(),
            "Degenerate data set: specificity cannot be computed"
        );
    }
}
