//! CLI argument parsing for distview

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the comparison report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "distview")]
#[command(version)]
#[command(
    about = "Compare NetFetcher latency distributions and test their separability",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Glob selecting the model (baseline) result files
    #[arg(short = 'm', long = "model", value_name = "GLOB")]
    pub model: Option<String>,

    /// Glob selecting the data (candidate) result files
    #[arg(short = 'd', long = "data", value_name = "GLOB")]
    pub data: Option<String>,

    /// Delay type: 0-4 read column N+1, 5 sums columns 3 and 4
    #[arg(
        short = 't',
        long = "delay-type",
        value_name = "TYPE",
        value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub delay_type: Option<u8>,

    /// Percentage of each file to sample, in (0, 100]
    #[arg(short = 'r', long = "rate", value_name = "PERCENT")]
    pub rate: Option<f64>,

    /// Number of threshold steps between the two group means
    #[arg(long = "resolution", value_name = "STEPS")]
    pub resolution: Option<u32>,

    /// Number of 1000us histogram buckets
    #[arg(long = "domain", value_name = "BUCKETS")]
    pub domain: Option<usize>,

    /// Clip the histogram domain at the pooled 99.9th percentile
    #[arg(long = "clip")]
    pub clip: bool,

    /// Seed for repeatable subsampling
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Only summarize and bin; skip the model/data matching session
    #[arg(long = "no-match")]
    pub no_match: bool,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the binned distributions to a CSV file
    #[arg(long = "histogram-csv", value_name = "PATH")]
    pub histogram_csv: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
