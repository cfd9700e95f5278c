//! Descriptive statistics for latency sample sets
//!
//! Mean and standard deviation go through trueno's SIMD vector primitives.
//! Quantiles use linear interpolation between closest ranks (R-7), since
//! trueno has no percentile function. Standard deviation is the population
//! form (divide by n).

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use trueno::Vector;

/// Convert integer samples into the f32 lanes trueno works on
pub fn to_lanes(samples: &[u64]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32).collect()
}

/// Mean of a non-empty slice
pub fn mean(values: &[f32]) -> Result<f32> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }
    Vector::from_slice(values)
        .mean()
        .map_err(|e| AnalysisError::Statistics(format!("mean: {}", e)))
}

/// Population standard deviation of a non-empty slice
pub fn stddev(values: &[f32]) -> Result<f32> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }
    if values.iter().all(|&v| v == values[0]) {
        return Ok(0.0);
    }
    Vector::from_slice(values)
        .stddev()
        .map_err(|e| AnalysisError::Statistics(format!("stddev: {}", e)))
}

/// Quantile `q` in `[0, 1]` of a non-empty slice
pub fn quantile(values: &[f32], q: f64) -> Result<f32> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(AnalysisError::Statistics(format!(
            "quantile {} outside [0, 1]",
            q
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(quantile_sorted(&sorted, q))
}

/// Quantile of already sorted, non-empty data
fn quantile_sorted(sorted: &[f32], q: f64) -> f32 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = q * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        (sorted[lower] as f64 * (1.0 - weight) + sorted[upper] as f64 * weight) as f32
    }
}

/// Summary of one sample set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32, // P50
    pub p90: f32,
    pub p99: f32,
    pub p999: f32,
}

impl SampleSummary {
    /// Summarize `samples`, or `None` for an empty set
    pub fn from_samples(samples: &[u64]) -> Result<Option<Self>> {
        if samples.is_empty() {
            return Ok(None);
        }

        let lanes = to_lanes(samples);
        let mut sorted = lanes.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Some(SampleSummary {
            count: samples.len(),
            mean: mean(&lanes)?,
            stddev: stddev(&lanes)?,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: quantile_sorted(&sorted, 0.5),
            p90: quantile_sorted(&sorted, 0.9),
            p99: quantile_sorted(&sorted, 0.99),
            p999: quantile_sorted(&sorted, 0.999),
        }))
    }
}
