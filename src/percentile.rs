//! 99.9th-percentile clipping of the histogram domain
//!
//! A handful of very slow requests would otherwise stretch the chart domain
//! far past where the distributions actually live. The clip bound is the
//! bucket holding the 99.9th percentile of all samples pooled together.

use crate::error::{AnalysisError, Result};
use crate::histogram::BIN_WIDTH;

/// Percentile used for clipping, as a fraction
pub const CLIP_QUANTILE: f64 = 0.999;

/// 99.9th percentile of `population`, floor-divided by the bucket width
///
/// Linear interpolation between closest ranks (R-7), evaluated on the
/// sorted integer samples so the bucket never shifts through rounding.
pub fn percentile999(population: &[u64]) -> Result<usize> {
    if population.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }

    let mut sorted = population.to_vec();
    sorted.sort_unstable();

    let p999 = floor_quantile(&sorted, CLIP_QUANTILE);
    Ok((p999 / BIN_WIDTH) as usize)
}

/// Floor of the R-7 quantile `q` of sorted, non-empty samples
fn floor_quantile(sorted: &[u64], q: f64) -> u64 {
    let index = q * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = (index.ceil() as usize).min(sorted.len() - 1);

    let base = sorted[lower];
    let weight = index - lower as f64;
    let offset = ((sorted[upper] - base) as f64 * weight).floor() as u64;

    // Interpolated value stays within [sorted[lower], sorted[upper]]
    base + offset.min(sorted[upper] - base)
}

/// Display domain for a clipped histogram: the percentile bound kept inside
/// `[1, domain_bound]`
pub fn clip_bound(population: &[u64], domain_bound: usize) -> Result<usize> {
    let bound = percentile999(population)?;
    Ok(bound.max(1).min(domain_bound))
}
