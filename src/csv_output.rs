//! CSV output format for distribution comparisons
//!
//! `--format csv` writes one row per matched model group. `--histogram-csv`
//! writes the binned distributions as `group,set,bucket,lower_us,count`
//! rows for external plotting.

use crate::classifier::ClassificationResult;
use crate::error::AnalysisError;
use crate::histogram::Histogram;
use crate::report::ReportSink;
use crate::sample_store::{Group, LoadFailure};
use crate::stats::SampleSummary;
use crate::viewer::HistogramSnapshot;
use std::path::Path;

/// CSV record for one matched model group
#[derive(Debug, Clone)]
pub struct CsvMatch {
    pub group: usize,
    pub source: String,
    pub result: Option<ClassificationResult>,
    pub error: Option<String>,
}

/// CSV match report formatter
///
/// Set summaries and load failures go to the log, not the table.
#[derive(Debug, Default)]
pub struct CsvOutput {
    matches: Vec<CsvMatch>,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new() -> Self {
        Self::default()
    }

    fn header() -> &'static str {
        "group,source,min_threshold,min_iteration,max_threshold,max_iteration,\
         true_positive,true_negative,false_positive,false_negative,\
         sensitivity,specificity,error"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format a match as CSV row
    fn format_match(record: &CsvMatch) -> String {
        let mut fields = vec![record.group.to_string(), Self::escape_field(&record.source)];

        match &record.result {
            Some(r) => fields.extend([
                r.min_threshold.to_string(),
                r.min_iteration.to_string(),
                r.max_threshold.to_string(),
                r.max_iteration.to_string(),
                r.true_positive.to_string(),
                r.true_negative.to_string(),
                r.false_positive.to_string(),
                r.false_negative.to_string(),
                r.sensitivity.to_string(),
                r.specificity.to_string(),
            ]),
            None => fields.resize(fields.len() + 10, String::new()),
        }

        fields.push(
            record
                .error
                .as_deref()
                .map(Self::escape_field)
                .unwrap_or_default(),
        );

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(Self::header());
        output.push('\n');

        for record in &self.matches {
            output.push_str(&Self::format_match(record));
            output.push('\n');
        }

        output
    }
}

impl ReportSink for CsvOutput {
    fn add_set(
        &mut self,
        _group: Group,
        _index: usize,
        _source: &Path,
        _summary: Option<&SampleSummary>,
    ) {
    }

    fn add_failure(&mut self, _group: Group, _failure: &LoadFailure) {}

    fn publish(&mut self, group: usize, source: &Path, result: &ClassificationResult) {
        self.matches.push(CsvMatch {
            group,
            source: source.display().to_string(),
            result: Some(result.clone()),
            error: None,
        });
    }

    fn reject(&mut self, group: usize, source: &Path, error: &AnalysisError) {
        self.matches.push(CsvMatch {
            group,
            source: source.display().to_string(),
            result: None,
            error: Some(error.to_string()),
        });
    }

    fn render(&self) -> anyhow::Result<String> {
        Ok(self.to_csv())
    }
}

/// CSV histogram export
///
/// Only non-empty buckets are written; missing buckets have count 0.
#[derive(Debug)]
pub struct CsvHistogramOutput<'a> {
    snapshot: &'a HistogramSnapshot,
}

impl<'a> CsvHistogramOutput<'a> {
    pub fn new(snapshot: &'a HistogramSnapshot) -> Self {
        Self { snapshot }
    }

    fn push_rows(output: &mut String, group: Group, histograms: &[Histogram]) {
        for (set, histogram) in histograms.iter().enumerate() {
            for (bucket, &count) in histogram.buckets().iter().enumerate() {
                if count == 0 {
                    continue;
                }
                output.push_str(&format!(
                    "{},{},{},{},{}\n",
                    group,
                    set,
                    bucket,
                    Histogram::bucket_lower_bound(bucket),
                    count
                ));
            }
        }
    }

    /// Generate CSV output for every histogram in the snapshot
    pub fn to_csv(&self) -> String {
        let mut output = String::from("group,set,bucket,lower_us,count\n");
        Self::push_rows(&mut output, Group::Model, &self.snapshot.model);
        Self::push_rows(&mut output, Group::Data, &self.snapshot.data);
        output
    }
}
