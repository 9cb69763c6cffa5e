//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete harness configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportOptions,
    #[serde(default)]
    pub run: RunConfig,
}

/// Reporting options
///
/// Fixed for the lifetime of a reporter, except `num_shards`, which the
/// reporter refreshes from the cluster on sharded deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Minimum elapsed seconds before periodic reports are emitted
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
    /// CSV log file; CSV output is skipped when absent
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Slow-op thresholds in milliseconds, one percentage column each
    #[serde(default = "default_slow_thresholds_ms")]
    pub slow_thresholds_ms: Vec<u64>,
    /// Ordered operation types; fixes console and CSV column order
    #[serde(default = "default_op_types")]
    pub op_types: Vec<String>,
    /// Target is a sharded cluster
    #[serde(default)]
    pub sharded: bool,
    /// Target is a single server even if `sharded` is set
    #[serde(default)]
    pub single_server: bool,
    /// Last known shard count
    #[serde(default = "default_num_shards")]
    pub num_shards: u32,
}

/// Operation type whose count drives the Inserted/Total columns
pub const INSERTS: &str = "inserts";

fn default_report_interval_secs() -> u64 {
    10
}

fn default_slow_thresholds_ms() -> Vec<u64> {
    vec![50]
}

fn default_op_types() -> Vec<String> {
    [INSERTS, "keyqueries", "updates", "rangequeries"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_num_shards() -> u32 {
    1
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
            log_file: None,
            slow_thresholds_ms: default_slow_thresholds_ms(),
            op_types: default_op_types(),
            sharded: false,
            single_server: false,
            num_shards: default_num_shards(),
        }
    }
}

impl ReportOptions {
    /// Whether each periodic report should re-query the shard count
    pub fn refreshes_shards(&self) -> bool {
        self.sharded && !self.single_server
    }
}

/// Simulated run settings for the demo harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of simulated worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Test duration in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    /// Documents present before the test started
    #[serde(default)]
    pub initial_count: u64,
    /// Reporter tick period in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_threads() -> usize {
    4
}

fn default_duration_secs() -> u64 {
    30
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            duration_secs: default_duration_secs(),
            initial_count: 0,
            tick_ms: default_tick_ms(),
        }
    }
}
