//! Periodic progress reporter
//!
//! The reporter turns the shared counters into console text and CSV rows at
//! three points of a test:
//!
//! - **Header**: once, before any report; truncates the CSV log
//! - **Periodic report**: on every schedule tick once the report interval
//!   has elapsed
//! - **Final report**: once, after the schedule stops
//!
//! Reporting never fails the test. CSV and cluster errors are logged and the
//! report carries on; a missing CSV row is acceptable, a missing console
//! report is not.
//!
//! # Example
//!
//! ```no_run
//! use pocreport::{ReportOptions, Reporter, StaticShardCounter, TestResults};
//! use std::sync::Arc;
//!
//! let options = ReportOptions::default();
//! let results = Arc::new(TestResults::new(&options.op_types, &options.slow_thresholds_ms, 0));
//! let mut reporter = Reporter::new(results, options, Arc::new(StaticShardCounter(1)));
//!
//! reporter.emit_header();
//! reporter.periodic_report();
//! reporter.final_report();
//! ```

pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

use crate::cluster::ShardCounter;
use crate::config::ReportOptions;
use crate::output::csv::CsvLog;
use crate::output::text;
use crate::stats::ResultsView;
use chrono::Local;
use snapshot::{FinalSnapshot, PeriodicSnapshot};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Progress reporter for one test run
pub struct Reporter<R: ResultsView> {
    results: Arc<R>,
    options: ReportOptions,
    cluster: Arc<dyn ShardCounter>,
    log: Option<CsvLog>,
    console: Box<dyn Write + Send>,
}

impl<R: ResultsView> Reporter<R> {
    /// Create a reporter printing to stdout
    ///
    /// # Arguments
    ///
    /// * `results` - Shared counters updated by the workers
    /// * `options` - Reporting options; CSV output is enabled by `log_file`
    /// * `cluster` - Handle used to refresh the shard count
    pub fn new(results: Arc<R>, options: ReportOptions, cluster: Arc<dyn ShardCounter>) -> Self {
        let log = options.log_file.as_ref().map(CsvLog::new);
        Self {
            results,
            options,
            cluster,
            log,
            console: Box::new(io::stdout()),
        }
    }

    /// Send console output somewhere other than stdout
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    /// Reporting options, including the cached shard count
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Shard count from the last successful refresh
    pub fn num_shards(&self) -> u32 {
        self.options.num_shards
    }

    /// Truncate the CSV log and write its header row
    ///
    /// Does nothing when no log file is configured.
    pub fn emit_header(&self) {
        let Some(ref log) = self.log else {
            return;
        };

        if let Err(e) = log.write_header(&self.options.op_types, &self.options.slow_thresholds_ms) {
            error!(error = %e, "failed to write CSV header");
        }
    }

    /// Print one periodic report
    ///
    /// Returns `false` without touching any output when the test has not yet
    /// run for the report interval.
    pub fn periodic_report(&mut self) -> bool {
        let seconds_elapsed = self.results.seconds_elapsed();
        if seconds_elapsed < self.options.report_interval_secs {
            debug!(
                seconds_elapsed,
                report_interval = self.options.report_interval_secs,
                "report interval not reached, skipping"
            );
            return false;
        }

        if self.options.refreshes_shards() {
            self.refresh_shard_count();
        }

        let now = Local::now().naive_local();
        let snapshot = PeriodicSnapshot::capture(&*self.results, &self.options, seconds_elapsed, now);

        if let Err(e) = text::write_periodic(&mut self.console, &snapshot, &self.options.slow_thresholds_ms) {
            error!(error = %e, "failed to print periodic report");
        }

        if let Some(ref log) = self.log {
            if let Err(e) = log.append_periodic(&snapshot) {
                error!(error = %e, "failed to append CSV report row");
            }
        }

        true
    }

    /// Print the cumulative summary
    ///
    /// Runs regardless of the report interval.
    pub fn final_report(&mut self) {
        let snapshot = FinalSnapshot::capture(&*self.results, &self.options);

        if let Err(e) = text::write_final(&mut self.console, &snapshot) {
            error!(error = %e, "failed to print final report");
        }

        if let Some(ref log) = self.log {
            if let Err(e) = log.append_final(&snapshot) {
                error!(error = %e, "failed to append CSV total row");
            }
        }
    }

    /// Re-query the cluster's shard count, keeping the cached value on failure
    fn refresh_shard_count(&mut self) {
        match self.cluster.count_shards() {
            Ok(shards) => {
                if shards != self.options.num_shards {
                    debug!(from = self.options.num_shards, to = shards, "shard count changed");
                }
                self.options.num_shards = shards;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    cached = self.options.num_shards,
                    "shard count refresh failed, keeping cached value"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FixedResults, ScriptedShards, SharedBuffer};
    use super::*;
    use crate::cluster::StaticShardCounter;
    use crate::stats::TestResults;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn options(log_file: Option<PathBuf>) -> ReportOptions {
        ReportOptions {
            report_interval_secs: 10,
            log_file,
            slow_thresholds_ms: vec![50, 100],
            op_types: vec!["inserts".into(), "updates".into()],
            ..Default::default()
        }
    }

    fn results(seconds: u64) -> Arc<FixedResults> {
        Arc::new(
            FixedResults::new(1_000, seconds)
                .with_op("inserts", 200, &[40, 10], 20)
                .with_op("updates", 0, &[0, 0], 0),
        )
    }

    fn reporter(
        results: Arc<FixedResults>,
        options: ReportOptions,
        cluster: Arc<dyn ShardCounter>,
    ) -> (Reporter<FixedResults>, SharedBuffer) {
        let console = SharedBuffer::default();
        let reporter = Reporter::new(results, options, cluster).with_console(Box::new(console.clone()));
        (reporter, console)
    }

    fn read_lines(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_header_without_log_is_noop() {
        let (reporter, console) = reporter(results(0), options(None), Arc::new(StaticShardCounter(1)));
        reporter.emit_header();
        assert!(console.contents().is_empty());
    }

    #[test]
    fn test_header_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        let (reporter, console) =
            reporter(results(0), options(Some(path.clone())), Arc::new(StaticShardCounter(1)));

        reporter.emit_header();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        let fields: Vec<_> = lines[0].trim_end_matches(',').split(',').collect();
        assert_eq!(&fields[..4], &["Timestamp", "Seconds", "Inserted", "Total"]);
        // rate plus one column per threshold, per op type
        assert_eq!(fields.len(), 4 + 2 * (1 + 2));
        assert_eq!(fields[4], "inserts_rate");
        assert_eq!(fields[5], "inserts_percent_under_50ms");
        assert_eq!(fields[6], "inserts_percent_under_100ms");
        assert_eq!(fields[7], "updates_rate");
        assert!(console.contents().is_empty());
    }

    #[test]
    fn test_interval_guard_skips_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        let shards = Arc::new(ScriptedShards::new(vec![Ok(4)]));
        let mut opts = options(Some(path.clone()));
        opts.sharded = true;
        let results = results(9);
        let (mut reporter, console) = reporter(results.clone(), opts, shards.clone());

        assert!(!reporter.periodic_report());

        assert!(console.contents().is_empty());
        assert!(!path.exists());
        assert_eq!(shards.calls(), 0);
        assert_eq!(results.interval_reads(), 0);
    }

    #[test]
    fn test_periodic_report_console() {
        let (mut reporter, console) = reporter(results(30), options(None), Arc::new(StaticShardCounter(1)));

        assert!(reporter.periodic_report());

        let out = console.contents();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], text::SEPARATOR);
        assert!(lines[1].starts_with("After 30 seconds ("));
        assert!(lines[1].ends_with("), 200 new documents inserted - collection has 1,200 in total"));
        assert_eq!(lines[2], "20 inserts per second since last report");
        assert_eq!(lines[3], "    80.00% in under 50 milliseconds");
        assert_eq!(lines[4], "    95.00% in under 100 milliseconds");
        assert_eq!(lines[5], "0 updates per second since last report");
        assert_eq!(lines[6], "    100.00% in under 50 milliseconds");
        assert_eq!(lines[7], "    100.00% in under 100 milliseconds");
        assert_eq!(lines[8], "");
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn test_periodic_reports_append_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        let results = results(10);
        let (mut reporter, _console) =
            reporter(results.clone(), options(Some(path.clone())), Arc::new(StaticShardCounter(1)));

        reporter.emit_header();
        assert!(reporter.periodic_report());
        results.set_seconds(20);
        assert!(reporter.periodic_report());

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);

        let header_fields = lines[0].split(',').count();
        for (line, seconds) in lines[1..].iter().zip(["10", "20"]) {
            let fields: Vec<_> = line.split(',').collect();
            assert_eq!(fields.len(), header_fields);
            assert!(fields[0].contains('T'));
            assert!(!fields[0].contains(' '));
            assert_eq!(fields[1], seconds);
            assert_eq!(&fields[2..10], &["200", "1200", "20", "80.00", "95.00", "0", "100.00", "100.00"]);
        }
    }

    #[test]
    fn test_final_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        let results = Arc::new(
            FixedResults::new(1_000, 60)
                .with_op("inserts", 600, &[0, 0], 0)
                .with_op("updates", 90, &[0, 0], 0),
        );
        let mut opts = options(Some(path.clone()));
        opts.report_interval_secs = 3_600;
        let (mut reporter, console) = reporter(results, opts, Arc::new(StaticShardCounter(1)));

        reporter.emit_header();
        reporter.final_report();

        let out = console.contents();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], text::SEPARATOR);
        assert_eq!(lines[1], "After 60 seconds, 600 new documents inserted - collection has 1600 in total");
        assert_eq!(lines[2], "10 inserts per second on average");
        assert_eq!(lines[3], "1 updates per second on average");

        let rows = read_lines(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "Total,60,600,1600,10,,1,,");
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_final_report_zero_seconds() {
        let results = Arc::new(FixedResults::new(0, 0).with_op("inserts", 600, &[0, 0], 0));
        let (mut reporter, console) = reporter(results, options(None), Arc::new(StaticShardCounter(1)));

        reporter.final_report();

        assert!(console.contents().contains("0 inserts per second on average"));
        assert!(logs_contain("average rates reported as 0"));
    }

    #[test]
    fn test_shard_count_refreshed_when_sharded() {
        let shards = Arc::new(ScriptedShards::new(vec![Ok(3), Ok(5)]));
        let mut opts = options(None);
        opts.sharded = true;
        let (mut reporter, _console) = reporter(results(30), opts, shards.clone());

        reporter.periodic_report();
        assert_eq!(reporter.num_shards(), 3);
        reporter.periodic_report();
        assert_eq!(reporter.num_shards(), 5);
        assert_eq!(reporter.options().num_shards, 5);
        assert_eq!(shards.calls(), 2);
    }

    #[test]
    fn test_shard_count_not_queried_for_single_server() {
        let shards = Arc::new(ScriptedShards::new(vec![Ok(3)]));
        let mut opts = options(None);
        opts.sharded = true;
        opts.single_server = true;
        let (mut reporter, _console) = reporter(results(30), opts, shards.clone());

        reporter.periodic_report();
        assert_eq!(shards.calls(), 0);
        assert_eq!(reporter.num_shards(), 1);
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_shard_count_failure_keeps_cache() {
        let shards = Arc::new(ScriptedShards::new(vec![Ok(4), Err("config server down".into())]));
        let mut opts = options(None);
        opts.sharded = true;
        let (mut reporter, console) = reporter(results(30), opts, shards);

        reporter.periodic_report();
        assert_eq!(reporter.num_shards(), 4);

        assert!(reporter.periodic_report());
        assert_eq!(reporter.num_shards(), 4);
        assert!(logs_contain("keeping cached value"));
        assert_eq!(console.contents().matches(text::SEPARATOR).count(), 2);
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_log_failure_keeps_console_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("run.csv");
        let (mut reporter, console) =
            reporter(results(30), options(Some(path.clone())), Arc::new(StaticShardCounter(1)));

        reporter.emit_header();
        assert!(reporter.periodic_report());
        reporter.final_report();

        assert!(!path.exists());
        let out = console.contents();
        assert!(out.contains("20 inserts per second since last report"));
        assert!(out.contains("per second on average"));
        assert!(logs_contain("failed to write CSV header"));
        assert!(logs_contain("failed to append CSV report row"));
    }

    #[test]
    fn test_with_live_counters() {
        let opts = ReportOptions {
            report_interval_secs: 0,
            slow_thresholds_ms: vec![50],
            op_types: vec!["inserts".into(), "updates".into()],
            ..Default::default()
        };
        let results = Arc::new(TestResults::new(&opts.op_types, &opts.slow_thresholds_ms, 10));
        for i in 0..200u64 {
            let latency = if i < 40 { Duration::from_millis(80) } else { Duration::from_millis(5) };
            results.record("inserts", latency);
        }

        let console = SharedBuffer::default();
        let mut reporter = Reporter::new(results, opts, Arc::new(StaticShardCounter(1)))
            .with_console(Box::new(console.clone()));

        assert!(reporter.periodic_report());
        let out = console.contents();
        assert!(out.contains("200 new documents inserted - collection has 210 in total"));
        assert!(out.contains("    80.00% in under 50 milliseconds"));
        assert!(out.contains("    100.00% in under 50 milliseconds"));
    }
}
