// Outlier trimming ahead of the threshold sweep
//
// Both sets are cut to the window [mean(low) - win, mean(high) + win] where
// win is the smaller of the two standard deviations. Long tails on either
// side would otherwise drag the sweep toward thresholds that only separate
// a few stragglers.

use crate::error::{AnalysisError, DegenerateStage, Result};

/// Mean and population standard deviation of a sample set
///
/// Summed over the integer samples and centred in f64 (two passes). The
/// window bounds are compared against the raw values, so they must keep
/// full microsecond precision at any magnitude.
pub(crate) fn moments(samples: &[u64]) -> Result<(f64, f64)> {
    if samples.is_empty() {
        return Err(AnalysisError::DegenerateDataSet {
            stage: DegenerateStage::Trim,
        });
    }

    let n = samples.len() as f64;
    let sum: u128 = samples.iter().map(|&v| u128::from(v)).sum();
    let mean = sum as f64 / n;

    let squares: f64 = samples
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();

    Ok((mean, (squares / n).sqrt()))
}

/// Trim both sets to the shared window, returning `(lower, higher)` by mean
///
/// The returned pair is ordered by mean, not by argument position. Either
/// input being empty, or a set losing every value to the window, is a
/// degenerate data set.
pub fn data_cut(d1: &[u64], d2: &[u64]) -> Result<(Vec<u64>, Vec<u64>)> {
    if d1.is_empty() || d2.is_empty() {
        return Err(AnalysisError::DegenerateDataSet {
            stage: DegenerateStage::Trim,
        });
    }

    let (mean1, std1) = moments(d1)?;
    let (mean2, std2) = moments(d2)?;

    let ((low, low_mean), (high, high_mean)) = if mean1 > mean2 {
        ((d2, mean2), (d1, mean1))
    } else {
        ((d1, mean1), (d2, mean2))
    };

    let win = std1.min(std2);
    let lo = low_mean - win;
    let hi = high_mean + win;

    let keep = |set: &[u64]| -> Vec<u64> {
        set.iter()
            .copied()
            .filter(|&v| {
                let v = v as f64;
                v >= lo && v <= hi
            })
            .collect()
    };

    let low_kept = keep(low);
    let high_kept = keep(high);

    tracing::debug!(
        "data_cut window [{:.3}, {:.3}]: kept {}/{} low, {}/{} high",
        lo,
        hi,
        low_kept.len(),
        low.len(),
        high_kept.len(),
        high.len()
    );

    if low_kept.is_empty() || high_kept.is_empty() {
        return Err(AnalysisError::DegenerateDataSet {
            stage: DegenerateStage::Trim,
        });
    }

    Ok((low_kept, high_kept))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sets_are_kept_whole() {
        let (low, high) = data_cut(&[1, 1, 1], &[10, 10]).unwrap();
        assert_eq!(low, vec![1, 1, 1]);
        assert_eq!(high, vec![10, 10]);
    }

    #[test]
    fn test_orders_by_mean() {
        let (low, high) = data_cut(&[10, 10], &[1, 1, 1]).unwrap();
        assert_eq!(low, vec![1, 1, 1]);
        assert_eq!(high, vec![10, 10]);
    }

    #[test]
    fn test_tails_outside_window_dropped() {
        // low: mean 10, std 10 ; high: mean 20, std ~1.633 => window ~[8.37, 21.63]
        let low = [0, 20, 0, 20];
        let high = [18, 20, 22];
        let (low_kept, high_kept) = data_cut(&low, &high).unwrap();
        assert_eq!(low_kept, vec![20, 20]);
        assert_eq!(high_kept, vec![18, 20]);
    }

    #[test]
    fn test_moments_exact_for_large_latencies() {
        assert_eq!(moments(&[16_777_219; 5]).unwrap(), (16_777_219.0, 0.0));

        let (mean, std) = moments(&vec![700_001; 200_000]).unwrap();
        assert_eq!(mean, 700_001.0);
        assert_eq!(std, 0.0);

        let (mean, std) = moments(&[33_554_431_998, 33_554_432_000]).unwrap();
        assert_eq!(mean, 33_554_431_999.0);
        assert_eq!(std, 1.0);
    }

    #[test]
    fn test_large_constant_sets_survive_window() {
        let (low, high) = data_cut(&[16_777_301; 5], &[16_777_219; 5]).unwrap();
        assert_eq!(low, vec![16_777_219; 5]);
        assert_eq!(high, vec![16_777_301; 5]);
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        let err = data_cut(&[], &[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateDataSet {
                stage: DegenerateStage::Trim
            }
        ));
    }
}
