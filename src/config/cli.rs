//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// pocreport - load-test progress reporter demo harness
///
/// Runs simulated workers against the shared counters and reports their
/// progress to the console and an optional CSV log.
#[derive(Parser, Debug, Default)]
#[command(name = "pocreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI options take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Report Options ===
    /// CSV log file (truncated at start, appended on every report)
    #[arg(short = 'l', long)]
    pub logfile: Option<PathBuf>,

    /// Minimum elapsed time before periodic reports are printed (e.g., 10s)
    #[arg(short = 'i', long)]
    pub report_interval: Option<String>,

    /// Slow-op thresholds in milliseconds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub slow_thresholds: Option<Vec<u64>>,

    /// Operation types to track, in column order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub op_types: Option<Vec<String>>,

    /// Target is a sharded cluster
    #[arg(long)]
    pub sharded: bool,

    /// Target is a single server
    #[arg(long)]
    pub single_server: bool,

    /// Shard count reported by the simulated cluster
    #[arg(long)]
    pub shards: Option<u32>,

    // === Run Options ===
    /// Number of simulated worker threads
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Test duration (e.g., 60s, 5m)
    #[arg(short = 'd', long)]
    pub duration: Option<String>,

    /// Documents present before the test started
    #[arg(long)]
    pub initial_count: Option<u64>,

    /// Reporter tick period (e.g., 1s, 500ms)
    #[arg(long)]
    pub tick: Option<String>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }

        if let Some(ref thresholds) = self.slow_thresholds {
            if thresholds.is_empty() {
                anyhow::bail!("slow-thresholds must list at least one value");
            }
        }

        Ok(())
    }
}
