// Threshold sweep between two group means
//
// Values of the lower-mean group carry label -1, values of the higher-mean
// group carry label +1. A threshold classifies `value < threshold` as
// negative and everything else as positive. The sweep walks the threshold
// from the lower mean to one step past the upper mean and keeps the range of
// thresholds with the best (sensitivity, specificity) pair.

use crate::classifier::config::ClassifierConfig;
use crate::classifier::trim::moments;
use crate::error::{AnalysisError, DegenerateStage, Result};
use serde::Serialize;

/// Confusion counts at one threshold
///
/// Naming follows the viewer's report: a `-1` value classified positive is a
/// false negative, a `+1` value classified negative is a false positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Pessimal starting point of every sweep: tp = tn = 0, fp = fn = 1
    pub const SEED: ConfusionMatrix = ConfusionMatrix {
        true_positive: 0,
        true_negative: 0,
        false_positive: 1,
        false_negative: 1,
    };

    /// `tp / (tp + fn)`
    pub fn sensitivity(&self) -> std::result::Result<f64, DegenerateStage> {
        let denominator = self.true_positive + self.false_negative;
        if denominator == 0 {
            return Err(DegenerateStage::Sensitivity);
        }
        Ok(self.true_positive as f64 / denominator as f64)
    }

    /// `tn / (tn + fp)`
    pub fn specificity(&self) -> std::result::Result<f64, DegenerateStage> {
        let denominator = self.true_negative + self.false_positive;
        if denominator == 0 {
            return Err(DegenerateStage::Specificity);
        }
        Ok(self.true_negative as f64 / denominator as f64)
    }
}

/// Best separation found by one sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Lowest threshold of the best plateau
    pub min_threshold: f64,
    /// Sweep iteration at which `min_threshold` was evaluated (0 = seed)
    pub min_iteration: usize,
    /// Highest threshold of the best plateau
    pub max_threshold: f64,
    pub max_iteration: usize,
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub sensitivity: f64,
    pub specificity: f64,
}

impl ClassificationResult {
    pub fn confusion(&self) -> ConfusionMatrix {
        ConfusionMatrix {
            true_positive: self.true_positive,
            true_negative: self.true_negative,
            false_positive: self.false_positive,
            false_negative: self.false_negative,
        }
    }
}

/// Labelled values, sorted so counts below a threshold are a binary search
struct LabelledSets {
    negatives: Vec<u64>,
    positives: Vec<u64>,
}

impl LabelledSets {
    fn confusion_at(&self, threshold: f64) -> ConfusionMatrix {
        let below = |set: &[u64]| set.partition_point(|&v| (v as f64) < threshold) as u64;

        let negatives_below = below(&self.negatives);
        let positives_below = below(&self.positives);

        ConfusionMatrix {
            true_positive: self.positives.len() as u64 - positives_below,
            true_negative: negatives_below,
            false_positive: positives_below,
            false_negative: self.negatives.len() as u64 - negatives_below,
        }
    }
}

/// Best-so-far state of a sweep
struct Best {
    matrix: ConfusionMatrix,
    sensitivity: f64,
    specificity: f64,
    min_threshold: f64,
    min_iteration: usize,
    max_threshold: f64,
    max_iteration: usize,
}

impl Best {
    fn seed(lower_bound: f64) -> Self {
        Best {
            matrix: ConfusionMatrix::SEED,
            sensitivity: 0.0,
            specificity: 0.0,
            min_threshold: lower_bound,
            min_iteration: 0,
            max_threshold: lower_bound,
            max_iteration: 0,
        }
    }

    fn offer(
        &mut self,
        threshold: f64,
        iteration: usize,
        matrix: ConfusionMatrix,
        sens: f64,
        spec: f64,
    ) {
        let improves = (sens > self.sensitivity && spec >= self.specificity)
            || (sens >= self.sensitivity && spec > self.specificity);

        if improves {
            self.matrix = matrix;
            self.sensitivity = sens;
            self.specificity = spec;
            self.min_threshold = threshold;
            self.min_iteration = iteration;
            self.max_threshold = threshold;
            self.max_iteration = iteration;
        } else if sens == self.sensitivity && spec == self.specificity {
            self.max_threshold = threshold;
            self.max_iteration = iteration;
        }
    }

    fn into_result(self) -> ClassificationResult {
        ClassificationResult {
            min_threshold: self.min_threshold,
            min_iteration: self.min_iteration,
            max_threshold: self.max_threshold,
            max_iteration: self.max_iteration,
            true_positive: self.matrix.true_positive,
            true_negative: self.matrix.true_negative,
            false_positive: self.matrix.false_positive,
            false_negative: self.matrix.false_negative,
            sensitivity: self.sensitivity,
            specificity: self.specificity,
        }
    }
}

/// Find the threshold range that best separates `d1` from `d2`
///
/// The lower-mean set is labelled `-1` whichever argument it arrives in, so
/// `learn_class(a, b)` and `learn_class(b, a)` agree whenever the means
/// differ.
///
/// Threshold `i` (1-based) is `lb + i * (ub - lb) / resolution`, for
/// `i = 1..=resolution + 1`. A step whose sensitivity or specificity has a
/// zero denominator is skipped; if every step is skipped the sets are
/// degenerate.
pub fn learn_class(
    d1: &[u64],
    d2: &[u64],
    config: &ClassifierConfig,
) -> Result<ClassificationResult> {
    config.validate().map_err(AnalysisError::InvalidConfig)?;

    if d1.is_empty() || d2.is_empty() {
        return Err(AnalysisError::DegenerateDataSet {
            stage: DegenerateStage::Trim,
        });
    }

    let (mean1, _) = moments(d1)?;
    let (mean2, _) = moments(d2)?;

    let (negatives, positives, lb, ub) = if mean1 > mean2 {
        (d2, d1, mean2, mean1)
    } else {
        (d1, d2, mean1, mean2)
    };

    let mut sets = LabelledSets {
        negatives: negatives.to_vec(),
        positives: positives.to_vec(),
    };
    sets.negatives.sort_unstable();
    sets.positives.sort_unstable();

    let resolution = config.resolution as usize;
    let steps = (ub - lb) / config.resolution as f64;

    let mut best = Best::seed(lb);
    let mut first_failure: Option<DegenerateStage> = None;
    let mut scored = 0usize;

    for iteration in 1..=resolution + 1 {
        let threshold = lb + steps * iteration as f64;
        let matrix = sets.confusion_at(threshold);

        let scores = matrix
            .sensitivity()
            .and_then(|sens| matrix.specificity().map(|spec| (sens, spec)));

        match scores {
            Ok((sens, spec)) => {
                scored += 1;
                best.offer(threshold, iteration, matrix, sens, spec);
            }
            Err(stage) => {
                tracing::trace!(
                    "Skipping threshold {:.3} (iteration {}): {} undefined",
                    threshold,
                    iteration,
                    stage
                );
                first_failure.get_or_insert(stage);
            }
        }
    }

    if scored == 0 {
        return Err(AnalysisError::DegenerateDataSet {
            stage: first_failure.unwrap_or(DegenerateStage::Sensitivity),
        });
    }

    let result = best.into_result();
    tracing::debug!(
        "learn_class: lb={:.3} ub={:.3} steps={:.5} scored={} \
         best=[{:.3} @{}, {:.3} @{}] sens={:.4} spec={:.4}",
        lb,
        ub,
        steps,
        scored,
        result.min_threshold,
        result.min_iteration,
        result.max_threshold,
        result.max_iteration,
        result.sensitivity,
        result.specificity
    );

    Ok(result)
}
