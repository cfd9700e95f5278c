//! Sample ingestion from NetFetcher experiment CSV files
//!
//! Each result file has one header row followed by rows of stage timestamps.
//! A [`DelayType`] selects which column (or column sum) becomes the sample for
//! a row. Files are grouped by a glob pattern into a [`SampleStore`] for the
//! "model" or the "data" side of a comparison.

use crate::error::{AnalysisError, Result};
use csv::StringRecord;
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Highest valid delay type selector
pub const MAX_DELAY_SELECTOR: usize = 5;

/// Which delay a row contributes as its sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelayType {
    /// Selector 0..=4: the value at column `selector + 1`
    Column(usize),
    /// Selector 5: column 3 plus column 4
    #[default]
    Combined,
}

impl DelayType {
    /// Map a numeric selector onto a delay type
    pub fn from_selector(selector: usize) -> Result<Self> {
        match selector {
            0..=4 => Ok(DelayType::Column(selector)),
            MAX_DELAY_SELECTOR => Ok(DelayType::Combined),
            other => Err(AnalysisError::InvalidDelayType(other)),
        }
    }

    /// The numeric selector this delay type was built from
    pub fn selector(&self) -> usize {
        match self {
            DelayType::Column(selector) => *selector,
            DelayType::Combined => MAX_DELAY_SELECTOR,
        }
    }

    /// Minimum number of columns a data row must have
    pub fn required_columns(&self) -> usize {
        match self {
            DelayType::Column(selector) => selector + 2,
            DelayType::Combined => 5,
        }
    }

    /// Extract the sample for one data row
    pub fn extract(&self, row: &StringRecord) -> std::result::Result<u64, String> {
        if row.len() < self.required_columns() {
            return Err(format!(
                "expected at least {} columns, found {}",
                self.required_columns(),
                row.len()
            ));
        }

        match self {
            DelayType::Column(selector) => parse_field(row, selector + 1),
            DelayType::Combined => {
                let seek = parse_field(row, 3)?;
                let read = parse_field(row, 4)?;
                seek.checked_add(read)
                    .ok_or_else(|| format!("column 3 + column 4 overflows ({} + {})", seek, read))
            }
        }
    }
}

impl fmt::Display for DelayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayType::Column(selector) => write!(f, "type {} (column {})", selector, selector + 1),
            DelayType::Combined => write!(f, "type 5 (column 3 + column 4)"),
        }
    }
}

fn parse_field(row: &StringRecord, index: usize) -> std::result::Result<u64, String> {
    let field = row.get(index).unwrap_or_default();
    field
        .parse::<u64>()
        .map_err(|e| format!("column {}: '{}': {}", index, field, e))
}

/// The two sides of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Baseline experiment runs
    Model,
    /// Candidate runs compared against the baseline
    Data,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Model => f.pad("model"),
            Group::Data => f.pad("data"),
        }
    }
}

/// Samples read from a single result file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    source: PathBuf,
    samples: Vec<u64>,
}

impl SampleSet {
    pub fn new(source: impl Into<PathBuf>, samples: Vec<u64>) -> Self {
        Self {
            source: source.into(),
            samples,
        }
    }

    /// Parse one result file
    pub fn from_csv(path: &Path, delay_type: DelayType) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| AnalysisError::FileLoad {
            path: path.to_path_buf(),
            line: 0,
            reason: e.to_string(),
        })?;
        Self::from_reader(path, file, delay_type)
    }

    /// Parse CSV content, attributing errors to `source`
    ///
    /// Exactly one header row is skipped. The first malformed row fails the
    /// whole file; rows are never skipped.
    pub fn from_reader<R: Read>(source: &Path, reader: R, delay_type: DelayType) -> Result<Self> {
        let load_error = |line: u64, reason: String| AnalysisError::FileLoad {
            path: source.to_path_buf(),
            line,
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| load_error(1, e.to_string()))?;
        if headers.is_empty() {
            return Err(load_error(1, "missing header row".to_string()));
        }

        let mut samples = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                load_error(line, e.to_string())
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let sample = delay_type
                .extract(&record)
                .map_err(|reason| load_error(line, reason))?;
            samples.push(sample);
        }

        Ok(Self::new(source, samples))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A file that matched a group's pattern but could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: AnalysisError,
}

/// All sample sets of one group, in file enumeration order
#[derive(Debug)]
pub struct SampleStore {
    group: Group,
    pattern: String,
    delay_type: DelayType,
    sets: Vec<SampleSet>,
    failures: Vec<LoadFailure>,
}

impl SampleStore {
    /// A store with no files, used before the first load
    pub fn empty(group: Group, pattern: impl Into<String>, delay_type: DelayType) -> Self {
        Self {
            group,
            pattern: pattern.into(),
            delay_type,
            sets: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Scan every file matching `pattern` and extract samples with `delay_type`
    ///
    /// A file that fails to parse is recorded in [`failures`](Self::failures)
    /// and contributes no set; the remaining files still load. Only an
    /// invalid pattern fails the whole load.
    pub fn load(group: Group, pattern: &str, delay_type: DelayType) -> Result<Self> {
        let entries = glob::glob(pattern).map_err(|e| AnalysisError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut sets = Vec::new();
        let mut failures = Vec::new();

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    let path = e.path().to_path_buf();
                    tracing::warn!("Skipping unreadable {} file {}: {}", group, path.display(), e);
                    failures.push(LoadFailure {
                        error: AnalysisError::FileLoad {
                            path: path.clone(),
                            line: 0,
                            reason: e.to_string(),
                        },
                        path,
                    });
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            match SampleSet::from_csv(&path, delay_type) {
                Ok(set) => {
                    tracing::debug!(
                        "Loaded {} samples for {} from {}",
                        set.len(),
                        group,
                        path.display()
                    );
                    sets.push(set);
                }
                Err(error) => {
                    tracing::warn!("{}", error);
                    failures.push(LoadFailure { path, error });
                }
            }
        }

        tracing::debug!(
            "{} group '{}': {} files loaded, {} failed",
            group,
            pattern,
            sets.len(),
            failures.len()
        );

        Ok(Self {
            group,
            pattern: pattern.to_string(),
            delay_type,
            sets,
            failures,
        })
    }

    /// Rescan the same pattern with a new delay type, replacing all sets
    ///
    /// On error the current contents are left untouched.
    pub fn reload(&mut self, delay_type: DelayType) -> Result<()> {
        *self = Self::load(self.group, &self.pattern, delay_type)?;
        Ok(())
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn delay_type(&self) -> DelayType {
        self.delay_type
    }

    pub fn sets(&self) -> &[SampleSet] {
        &self.sets
    }

    pub fn get(&self, index: usize) -> Option<&SampleSet> {
        self.sets.get(index)
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Every sample of every set
    pub fn pooled(&self) -> impl Iterator<Item = u64> + '_ {
        self.sets.iter().flat_map(|set| set.samples().iter().copied())
    }

    pub fn total_samples(&self) -> usize {
        self.sets.iter().map(SampleSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str, selector: usize) -> Result<SampleSet> {
        let delay_type = DelayType::from_selector(selector).unwrap();
        SampleSet::from_reader(Path::new("mem.csv"), content.as_bytes(), delay_type)
    }

    #[test]
    fn test_delay_type_selectors() {
        assert_eq!(DelayType::from_selector(0).unwrap(), DelayType::Column(0));
        assert_eq!(DelayType::from_selector(4).unwrap(), DelayType::Column(4));
        assert_eq!(DelayType::from_selector(5).unwrap(), DelayType::Combined);
        assert!(matches!(
            DelayType::from_selector(6),
            Err(AnalysisError::InvalidDelayType(6))
        ));
        assert_eq!(DelayType::default().selector(), 5);
    }

    #[test]
    fn test_column_selector_reads_next_column() {
        let set = parse("t0,t1,t2,t3,t4,t5\n0,11,22,33,44,55\n1,12,23,34,45,56\n", 1).unwrap();
        assert_eq!(set.samples(), &[22, 23]);
    }

    #[test]
    fn test_combined_sums_columns_three_and_four() {
        let set = parse("a,b,c,d,e\n0,1,2,3000,4000\n0,1,2,10,20\n", 5).unwrap();
        assert_eq!(set.samples(), &[7000, 30]);
    }

    #[test]
    fn test_header_row_is_skipped_only_once() {
        let set = parse("a,b,c,d,e\n1,2,3,4,5\n", 0).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.samples(), &[2]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let set = parse("a,b,c,d,e\n0, 1 ,2, 3 , 4\n", 5).unwrap();
        assert_eq!(set.samples(), &[7]);
    }

    #[test]
    fn test_bad_row_fails_whole_file() {
        let err = parse("a,b,c,d,e\n0,1,2,3,4\n0,1,2,x,4\n0,1,2,3,4\n", 5).unwrap_err();
        match err {
            AnalysisError::FileLoad { path, line, reason } => {
                assert_eq!(path, PathBuf::from("mem.csv"));
                assert_eq!(line, 3);
                assert!(reason.contains("column 3"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_row_fails() {
        let err = parse("a,b,c,d,e\n0,1,2\n", 5).unwrap_err();
        assert!(err.to_string().contains("expected at least 5 columns"));
    }

    #[test]
    fn test_negative_value_fails() {
        assert!(parse("a,b,c,d,e\n0,1,2,-3,4\n", 5).is_err());
    }

    #[test]
    fn test_missing_header_fails() {
        let err = parse("", 5).unwrap_err();
        assert!(err.to_string().contains("missing header row"));
    }

    #[test]
    fn test_header_only_file_is_empty_set() {
        let set = parse("a,b,c,d,e\n", 5).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_combined_overflow_fails() {
        let content = format!("a,b,c,d,e\n0,0,0,{},1\n", u64::MAX);
        assert!(parse(&content, 5).unwrap_err().to_string().contains("overflows"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = SampleStore::load(Group::Model, "ExpRes/[", DelayType::Combined).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPattern { .. }));
    }

    #[test]
    fn test_failing_file_does_not_block_group() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("run_1.csv"), "a,b,c,d,e\n0,1,2,3,4\n").unwrap();
        std::fs::write(dir.path().join("run_2.csv"), "a,b,c,d,e\n0,1,2,3\n").unwrap();
        std::fs::write(dir.path().join("run_3.csv"), "a,b,c,d,e\n0,1,2,30,40\n").unwrap();
        std::fs::create_dir(dir.path().join("run_4.csv")).unwrap();

        let pattern = dir.path().join("run_*.csv");
        let store =
            SampleStore::load(Group::Data, &pattern.to_string_lossy(), DelayType::Combined)
                .unwrap();

        assert_eq!(store.sets().len(), 2);
        assert_eq!(store.get(0).unwrap().samples(), &[7]);
        assert_eq!(store.get(1).unwrap().samples(), &[70]);
        assert_eq!(store.failures().len(), 1);
        assert!(store.failures()[0].path.ends_with("run_2.csv"));
        assert_eq!(store.pooled().collect::<Vec<_>>(), vec![7, 70]);
        assert_eq!(store.total_samples(), 2);
    }

    #[test]
    fn test_reload_switches_delay_type() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("run_1.csv"), "a,b,c,d,e\n0,1,2,3,4\n").unwrap();

        let pattern = dir.path().join("run_*.csv");
        let mut store =
            SampleStore::load(Group::Model, &pattern.to_string_lossy(), DelayType::Combined)
                .unwrap();
        assert_eq!(store.pooled().collect::<Vec<_>>(), vec![7]);

        store.reload(DelayType::Column(0)).unwrap();
        assert_eq!(store.delay_type(), DelayType::Column(0));
        assert_eq!(store.pooled().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_group_display() {
        assert_eq!(Group::Model.to_string(), "model");
        assert_eq!(Group::Data.to_string(), "data");
    }
}
