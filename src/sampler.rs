//! Rate-limited subsampling of sample sets
//!
//! Charts and the classifier never work on a full result file; they work on a
//! uniform draw without replacement whose size is a percentage of the file.
//! This keeps each refresh bounded no matter how long an experiment ran.
//!
//! | Rate | Draw size for 12 345 samples |
//! |------|------------------------------|
//! | 10%  | 1 234                        |
//! | 50%  | 6 172                        |
//! | 100% | 12 345                       |

use crate::error::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of elements a `rate_percent` draw takes from `population` elements
///
/// `floor(population * rate_percent / 100)`; the rate must lie in `(0, 100]`.
pub fn draw_size(population: usize, rate_percent: f64) -> Result<usize> {
    if rate_percent.is_nan() || rate_percent <= 0.0 || rate_percent > 100.0 {
        return Err(AnalysisError::InvalidSampleRate(rate_percent));
    }
    Ok((population as f64 * rate_percent / 100.0).floor() as usize)
}

/// Uniform sampler without replacement
///
/// A sampler built with [`Sampler::seeded`] produces the same sequence of
/// draws for the same sequence of calls.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler seeded from OS entropy
    pub fn new() -> Self {
        Sampler {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a repeatable sampler
    pub fn seeded(seed: u64) -> Self {
        Sampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw `floor(len * rate_percent / 100)` samples without replacement
    ///
    /// An empty population yields an empty draw for any valid rate. The
    /// order of the returned samples is not the order of `population`.
    pub fn subsample(&mut self, population: &[u64], rate_percent: f64) -> Result<Vec<u64>> {
        let count = draw_size(population.len(), rate_percent)?;
        self.subsample_count(population, count)
    }

    /// Draw exactly `count` samples without replacement
    pub fn subsample_count(&mut self, population: &[u64], count: usize) -> Result<Vec<u64>> {
        if count > population.len() {
            return Err(AnalysisError::InvalidSampleSize {
                requested: count,
                available: population.len(),
            });
        }

        if count == population.len() {
            let mut all = population.to_vec();
            all.shuffle(&mut self.rng);
            return Ok(all);
        }

        Ok(population
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect())
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}
