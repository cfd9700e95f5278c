// Threshold classification of two latency distributions
//
// Given samples of a model group and of the data group, decide how well a
// single latency threshold separates them:
//
// 1. data_cut    - trim both sets to [mean(low) - win, mean(high) + win],
//                  win = min(std(low), std(high))
// 2. learn_class - label the lower-mean set -1 and the other +1, then sweep
//                  the threshold between the two means in `resolution` steps
// 3. report      - the threshold range with the best sensitivity/specificity
//                  and its confusion counts
//
// Matching several model groups against the data group is spread over
// scheduler ticks with a MatchCursor.

mod config;
mod cursor;
mod sweep;
mod trim;

pub use config::{ClassifierConfig, DEFAULT_RESOLUTION};
pub use cursor::{MatchCursor, MAX_MATCH_GROUPS};
pub use sweep::{learn_class, ClassificationResult, ConfusionMatrix};
pub use trim::data_cut;

use crate::error::Result;

/// Trim both sets, then sweep for the best threshold
pub fn classify(
    model: &[u64],
    data: &[u64],
    config: &ClassifierConfig,
) -> Result<ClassificationResult> {
    let (low, high) = data_cut(model, data)?;
    learn_class(&low, &high, config)
}
