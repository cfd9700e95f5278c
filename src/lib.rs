//! distview - latency distribution viewer and threshold classifier
//!
//! This library loads NetFetcher experiment result files into "model" and
//! "data" sample groups, bins subsampled latencies into fixed-width
//! histograms, and measures how well a single latency threshold separates
//! a model group from the data group.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod histogram;
pub mod json_output;
pub mod percentile;
pub mod report;
pub mod sample_store;
pub mod sampler;
pub mod stats;
pub mod viewer;
