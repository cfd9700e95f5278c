//! Report sinks
//!
//! The CLI pushes everything it learns about a run into a [`ReportSink`]:
//! one summary per loaded sample set, every file that failed to load, and
//! one record per matched model group. The sink renders it once the match
//! session is over. Text lives here; JSON and CSV renderings live in
//! [`crate::json_output`] and [`crate::csv_output`].

use crate::classifier::ClassificationResult;
use crate::error::AnalysisError;
use crate::sample_store::{Group, LoadFailure};
use crate::stats::SampleSummary;
use std::fmt::Write as _;
use std::path::Path;

/// Consumer of sample-set summaries and classification records
pub trait ReportSink {
    /// One loaded sample set; `summary` is `None` for a file with no rows
    fn add_set(
        &mut self,
        group: Group,
        index: usize,
        source: &Path,
        summary: Option<&SampleSummary>,
    );

    /// A file that matched a group's pattern but did not load
    fn add_failure(&mut self, group: Group, failure: &LoadFailure);

    /// Classification of model group `group` against data group 0
    fn publish(&mut self, group: usize, source: &Path, result: &ClassificationResult);

    /// Model group `group` could not be classified
    fn reject(&mut self, group: usize, source: &Path, error: &AnalysisError);

    /// Render everything collected so far
    fn render(&self) -> anyhow::Result<String>;
}

/// Human-readable report
#[derive(Debug, Default)]
pub struct TextReport {
    sets: String,
    failures: String,
    matches: String,
}

impl TextReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for TextReport {
    fn add_set(
        &mut self,
        group: Group,
        index: usize,
        source: &Path,
        summary: Option<&SampleSummary>,
    ) {
        let _ = write!(self.sets, "{:<5} [{}] {}", group, index, source.display());
        match summary {
            Some(s) => {
                let _ = writeln!(
                    self.sets,
                    "  n={} mean={:.1} std={:.1} min={:.0} p50={:.0} p90={:.0} \
                     p99={:.0} p99.9={:.0} max={:.0}",
                    s.count,
                    s.mean,
                    s.stddev,
                    s.min,
                    s.median,
                    s.p90,
                    s.p99,
                    s.p999,
                    s.max
                );
            }
            None => {
                let _ = writeln!(self.sets, "  (no samples)");
            }
        }
    }

    fn add_failure(&mut self, group: Group, failure: &LoadFailure) {
        let _ = writeln!(self.failures, "{:<5} skipped: {}", group, failure.error);
    }

    fn publish(&mut self, group: usize, source: &Path, result: &ClassificationResult) {
        let _ = writeln!(
            self.matches,
            "group {} ({}) vs data 0:",
            group,
            source.display()
        );
        let _ = writeln!(
            self.matches,
            "  threshold  [{:.3} @ {}, {:.3} @ {}]",
            result.min_threshold, result.min_iteration, result.max_threshold, result.max_iteration
        );
        let _ = writeln!(
            self.matches,
            "  TP={} TN={} FP={} FN={}",
            result.true_positive, result.true_negative, result.false_positive, result.false_negative
        );
        let _ = writeln!(
            self.matches,
            "  sensitivity={:.4} specificity={:.4}",
            result.sensitivity, result.specificity
        );
    }

    fn reject(&mut self, group: usize, source: &Path, error: &AnalysisError) {
        let _ = writeln!(
            self.matches,
            "group {} ({}) vs data 0:\n  not classified: {}",
            group,
            source.display(),
            error
        );
    }

    fn render(&self) -> anyhow::Result<String> {
        let mut output = String::new();
        output.push_str(&self.sets);
        output.push_str(&self.failures);
        if !self.matches.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&self.matches);
        }
        Ok(output)
    }
}
