//! TOML configuration file parsing

use super::cli::Cli;
use super::cli_convert::{parse_duration, parse_time_ms};
use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Override report settings
    if let Some(ref path) = cli.logfile {
        config.report.log_file = Some(path.clone());
    }
    if let Some(ref interval) = cli.report_interval {
        config.report.report_interval_secs =
            parse_duration(interval).context("Invalid report interval")?;
    }
    if let Some(ref thresholds) = cli.slow_thresholds {
        config.report.slow_thresholds_ms = thresholds.clone();
    }
    if let Some(ref op_types) = cli.op_types {
        config.report.op_types = op_types.clone();
    }
    if cli.sharded {
        config.report.sharded = true;
    }
    if cli.single_server {
        config.report.single_server = true;
    }
    if let Some(shards) = cli.shards {
        config.report.num_shards = shards;
    }

    // Override run settings
    if let Some(threads) = cli.threads {
        config.run.threads = threads;
    }
    if let Some(ref duration) = cli.duration {
        config.run.duration_secs = parse_duration(duration).context("Invalid duration")?;
    }
    if let Some(count) = cli.initial_count {
        config.run.initial_count = count;
    }
    if let Some(ref tick) = cli.tick {
        config.run.tick_ms = parse_time_ms(tick).context("Invalid tick period")?;
    }

    Ok(config)
}

/// Build the effective configuration from an optional file plus CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    merge_cli_with_config(cli, base)
}
