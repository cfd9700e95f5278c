//! Fixed-width occurrence histograms over a bounded latency domain
//!
//! Bucket `i` counts samples in `[i * BIN_WIDTH, (i + 1) * BIN_WIDTH)`.
//! Samples at or past `domain_bound * BIN_WIDTH` are dropped.

/// Width of one bucket in sample units (microseconds)
pub const BIN_WIDTH: u64 = 1000;

/// Default number of buckets, matching the 750-point distribution chart
pub const DEFAULT_DOMAIN_BOUND: usize = 750;

/// Occurrence counts, one per bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    buckets: Vec<u64>,
}

/// Bin `samples` into a fresh histogram with `domain_bound` buckets
pub fn bin(samples: &[u64], domain_bound: usize) -> Histogram {
    let mut histogram = Histogram::new(domain_bound);
    histogram.rebin(samples);
    histogram
}

impl Histogram {
    /// An all-zero histogram with `domain_bound` buckets
    pub fn new(domain_bound: usize) -> Self {
        Histogram {
            buckets: vec![0; domain_bound],
        }
    }

    /// Clear every bucket and bin `samples` again
    pub fn rebin(&mut self, samples: &[u64]) {
        self.buckets.fill(0);

        let bound = self.buckets.len() as u64;
        for &sample in samples {
            let bucket = sample / BIN_WIDTH;
            if bucket < bound {
                self.buckets[bucket as usize] += 1;
            }
        }
    }

    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Number of buckets (the domain bound)
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Samples that landed inside the domain
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Index of the fullest bucket (lowest index on ties), if any sample landed
    pub fn peak_bucket(&self) -> Option<usize> {
        let mut peak: Option<(usize, u64)> = None;
        for (index, &count) in self.buckets.iter().enumerate() {
            if count > peak.map_or(0, |(_, c)| c) {
                peak = Some((index, count));
            }
        }
        peak.map(|(index, _)| index)
    }

    /// Lower edge of a bucket in sample units
    pub fn bucket_lower_bound(index: usize) -> u64 {
        index as u64 * BIN_WIDTH
    }
}
