//! Configuration validation

use super::*;
use anyhow::Result;
use std::collections::HashSet;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_report(&config.report)?;
    validate_run(&config.run)?;

    Ok(())
}

/// Validate reporting options
///
/// Operation names and thresholds become CSV column names, so they must be
/// unique and free of separators.
pub fn validate_report(report: &ReportOptions) -> Result<()> {
    if report.op_types.is_empty() {
        anyhow::bail!("op_types must contain at least one operation type");
    }

    let mut seen = HashSet::new();
    for op in &report.op_types {
        if op.is_empty() {
            anyhow::bail!("op_types must not contain empty names");
        }
        if op.contains(',') || op.chars().any(char::is_whitespace) {
            anyhow::bail!("op type '{}' must not contain commas or whitespace", op);
        }
        if !seen.insert(op.as_str()) {
            anyhow::bail!("op type '{}' is listed more than once", op);
        }
    }

    if report.slow_thresholds_ms.is_empty() {
        anyhow::bail!("slow_thresholds_ms must contain at least one threshold");
    }

    let mut seen = HashSet::new();
    for &threshold in &report.slow_thresholds_ms {
        if threshold == 0 {
            anyhow::bail!("slow thresholds must be greater than 0");
        }
        if !seen.insert(threshold) {
            anyhow::bail!("slow threshold {}ms is listed more than once", threshold);
        }
    }

    if !report.op_types.iter().any(|o| o == INSERTS) {
        tracing::warn!(
            "op_types has no '{}' entry, Inserted and Total columns will not grow",
            INSERTS
        );
    }

    if report.sharded && report.single_server {
        tracing::warn!("sharded and single_server both set, shard count will not be refreshed");
    }

    Ok(())
}

/// Validate demo run settings
pub fn validate_run(run: &RunConfig) -> Result<()> {
    if run.threads == 0 {
        anyhow::bail!("run.threads must be at least 1");
    }

    if run.tick_ms == 0 {
        anyhow::bail!("run.tick_ms must be greater than 0");
    }

    if run.threads > 1024 {
        tracing::warn!(
            threads = run.threads,
            "very high thread count, this may cause performance issues"
        );
    }

    Ok(())
}
