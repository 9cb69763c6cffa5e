//! Report snapshots and the arithmetic behind them
//!
//! A snapshot is read from the shared counters once per report, and both
//! the console and the CSV log are rendered from it.

use crate::config::{ReportOptions, INSERTS};
use crate::stats::ResultsView;
use chrono::NaiveDateTime;
use tracing::warn;

/// Percentage of operations that completed under a latency threshold
///
/// With no operations observed nothing was slow, so the result is 100.
/// Clamped at 0 because slow counts may be read a moment after the total.
pub fn percent_under(slow_ops: u64, ops_done: u64) -> f64 {
    if ops_done == 0 {
        return 100.0;
    }
    (100.0 - (slow_ops as f64 * 100.0) / ops_done as f64).max(0.0)
}

/// Average operations per second over the whole run, truncated toward zero
///
/// Returns `None` when no whole second has elapsed.
pub fn average_rate(ops_done: u64, seconds_elapsed: u64) -> Option<u64> {
    if seconds_elapsed == 0 {
        return None;
    }
    Some((ops_done as f64 / seconds_elapsed as f64) as u64)
}

/// One operation type's line in a periodic report
#[derive(Debug, Clone, PartialEq)]
pub struct OpInterval {
    pub op_type: String,
    /// Operations per second since the previous report
    pub rate: u64,
    /// Percent under each threshold, in threshold order
    pub percent_under: Vec<f64>,
}

/// Everything a periodic report prints
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicSnapshot {
    pub time: NaiveDateTime,
    pub seconds_elapsed: u64,
    pub inserted: u64,
    pub total: u64,
    pub ops: Vec<OpInterval>,
}

impl PeriodicSnapshot {
    /// Read the counters for one periodic report
    ///
    /// Interval rates are read exactly once, which also resets them.
    pub fn capture<R: ResultsView + ?Sized>(
        results: &R,
        options: &ReportOptions,
        seconds_elapsed: u64,
        time: NaiveDateTime,
    ) -> Self {
        let inserted = results.ops_done(INSERTS);
        let rates = results.ops_per_second_last_interval();

        let ops = options
            .op_types
            .iter()
            .map(|op_type| {
                let done = results.ops_done(op_type);
                let percent_under = (0..options.slow_thresholds_ms.len())
                    .map(|idx| percent_under(results.slow_ops(op_type, idx), done))
                    .collect();

                OpInterval {
                    op_type: op_type.clone(),
                    rate: rates.get(op_type).copied().unwrap_or(0),
                    percent_under,
                }
            })
            .collect();

        Self {
            time,
            seconds_elapsed,
            inserted,
            total: results.initial_count() + inserted,
            ops,
        }
    }
}

/// One operation type's line in the final summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpAverage {
    pub op_type: String,
    pub average_rate: u64,
}

/// Everything the final summary prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSnapshot {
    pub seconds_elapsed: u64,
    pub inserted: u64,
    pub total: u64,
    pub ops: Vec<OpAverage>,
}

impl FinalSnapshot {
    /// Read the cumulative counters for the final summary
    ///
    /// A zero-second run reports every average as 0.
    pub fn capture<R: ResultsView + ?Sized>(results: &R, options: &ReportOptions) -> Self {
        let seconds_elapsed = results.seconds_elapsed();
        let inserted = results.ops_done(INSERTS);

        if seconds_elapsed == 0 {
            warn!("test ran for less than a second, average rates reported as 0");
        }

        let ops = options
            .op_types
            .iter()
            .map(|op_type| OpAverage {
                op_type: op_type.clone(),
                average_rate: average_rate(results.ops_done(op_type), seconds_elapsed)
                    .unwrap_or(0),
            })
            .collect();

        Self {
            seconds_elapsed,
            inserted,
            total: results.initial_count() + inserted,
            ops,
        }
    }
}
