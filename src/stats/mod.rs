//! Shared test counters
//!
//! Lock-free per-operation counters written by workload threads and read by
//! the reporter.
//!
//! Key features:
//!
//! - **Lock-free atomic counters**: ops done and slow ops without contention
//! - **Cache-line alignment**: Prevents false sharing between worker threads
//! - **Fixed operation set**: Operation types are fixed at construction
//! - **Interval rates**: Per-second rates since the previous read
//!
//! # Example
//!
//! ```
//! use pocreport::stats::{ResultsView, TestResults};
//! use std::time::Duration;
//!
//! let ops = vec!["inserts".to_string(), "updates".to_string()];
//! let results = TestResults::new(&ops, &[50, 100], 1_000);
//!
//! results.record("inserts", Duration::from_millis(20));
//! results.record("inserts", Duration::from_millis(75));
//!
//! assert_eq!(results.ops_done("inserts"), 2);
//! assert_eq!(results.slow_ops("inserts", 0), 1);
//! assert_eq!(results.slow_ops("inserts", 1), 0);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache-line aligned atomic counter to prevent false sharing
///
/// Worker threads bump different operation counters concurrently. Each
/// counter sits on its own 64-byte cache line so updates to one do not
/// invalidate the line holding another.
///
/// ```text
/// [value: 8 bytes][padding: 56 bytes] = 64 bytes total
/// ```
#[repr(align(64))]
#[derive(Debug)]
pub struct AlignedCounter {
    value: AtomicU64,
    _padding: [u8; 56],
}

impl AlignedCounter {
    /// Create a new counter with initial value 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
            _padding: [0; 56],
        }
    }

    /// Increment the counter by the specified amount
    ///
    /// Uses `Ordering::Relaxed`; no ordering is needed between counters.
    #[inline]
    pub fn add(&self, val: u64) {
        self.value.fetch_add(val, Ordering::Relaxed);
    }

    /// Get the current value of the counter
    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for AlignedCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Read interface the reporter consumes
///
/// Each call is its own point-in-time read. Callers must not assume two
/// calls observe the same instant.
pub trait ResultsView: Send + Sync {
    /// Document count present before the test started
    fn initial_count(&self) -> u64;

    /// Cumulative operations completed for `op_type`
    fn ops_done(&self, op_type: &str) -> u64;

    /// Per-second rate for every operation type since the previous call
    ///
    /// Resets the interval baseline as a side effect.
    fn ops_per_second_last_interval(&self) -> HashMap<String, u64>;

    /// Cumulative operations of `op_type` slower than threshold `threshold_index`
    fn slow_ops(&self, op_type: &str, threshold_index: usize) -> u64;

    /// Whole seconds since the test started
    fn seconds_elapsed(&self) -> u64;
}

/// Per-operation counters
#[derive(Debug)]
struct OpCounters {
    done: AlignedCounter,
    slow: Vec<AlignedCounter>,
}

/// Baseline for interval rates
#[derive(Debug)]
struct IntervalBaseline {
    at: Instant,
    ops: Vec<u64>,
}

/// Shared counters for a whole test run
///
/// Created once at test start and shared (behind an `Arc`) by all workers
/// and the reporter. Counters are lock-free; only the interval baseline is
/// behind a mutex, and only the reporter touches it.
#[derive(Debug)]
pub struct TestResults {
    op_types: Vec<String>,
    thresholds_ms: Vec<u64>,
    initial_count: u64,
    start: Instant,
    counters: Vec<OpCounters>,
    interval: Mutex<IntervalBaseline>,
}

impl TestResults {
    /// Create counters for the given operation types and latency thresholds
    ///
    /// # Arguments
    ///
    /// * `op_types` - Ordered operation type names
    /// * `thresholds_ms` - Ordered slow-op thresholds in milliseconds
    /// * `initial_count` - Documents present before the test started
    pub fn new(op_types: &[String], thresholds_ms: &[u64], initial_count: u64) -> Self {
        Self::started_at(op_types, thresholds_ms, initial_count, Instant::now())
    }

    /// Create counters with an explicit start instant
    pub fn started_at(
        op_types: &[String],
        thresholds_ms: &[u64],
        initial_count: u64,
        start: Instant,
    ) -> Self {
        let counters = op_types
            .iter()
            .map(|_| OpCounters {
                done: AlignedCounter::new(),
                slow: thresholds_ms.iter().map(|_| AlignedCounter::new()).collect(),
            })
            .collect();

        Self {
            op_types: op_types.to_vec(),
            thresholds_ms: thresholds_ms.to_vec(),
            initial_count,
            start,
            counters,
            interval: Mutex::new(IntervalBaseline {
                at: start,
                ops: vec![0; op_types.len()],
            }),
        }
    }

    /// Ordered operation type names
    pub fn op_types(&self) -> &[String] {
        &self.op_types
    }

    /// Ordered slow-op thresholds in milliseconds
    pub fn thresholds_ms(&self) -> &[u64] {
        &self.thresholds_ms
    }

    /// Position of `op_type` in the fixed operation list
    pub fn op_index(&self, op_type: &str) -> Option<usize> {
        self.op_types.iter().position(|o| o == op_type)
    }

    /// Record one completed operation
    ///
    /// Returns `false` if `op_type` is not one of the configured types; the
    /// operation set never grows after construction.
    pub fn record(&self, op_type: &str, latency: Duration) -> bool {
        match self.op_index(op_type) {
            Some(idx) => {
                self.record_index(idx, latency);
                true
            }
            None => false,
        }
    }

    /// Record one completed operation by its position in the operation list
    ///
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn record_index(&self, idx: usize, latency: Duration) {
        let Some(op) = self.counters.get(idx) else {
            return;
        };
        op.done.add(1);

        let latency_ms = latency.as_millis();
        for (threshold, slow) in self.thresholds_ms.iter().zip(&op.slow) {
            if latency_ms > u128::from(*threshold) {
                slow.add(1);
            }
        }
    }
}

impl ResultsView for TestResults {
    fn initial_count(&self) -> u64 {
        self.initial_count
    }

    fn ops_done(&self, op_type: &str) -> u64 {
        self.op_index(op_type)
            .map(|idx| self.counters[idx].done.get())
            .unwrap_or(0)
    }

    fn ops_per_second_last_interval(&self) -> HashMap<String, u64> {
        let now = Instant::now();
        let mut baseline = self
            .interval
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let millis = now.duration_since(baseline.at).as_millis();
        let mut rates = HashMap::with_capacity(self.op_types.len());

        for (idx, op_type) in self.op_types.iter().enumerate() {
            let current = self.counters[idx].done.get();
            let delta = current.saturating_sub(baseline.ops[idx]);
            let rate = if millis == 0 {
                delta
            } else {
                u64::try_from(u128::from(delta) * 1000 / millis).unwrap_or(u64::MAX)
            };
            baseline.ops[idx] = current;
            rates.insert(op_type.clone(), rate);
        }

        baseline.at = now;
        rates
    }

    fn slow_ops(&self, op_type: &str, threshold_index: usize) -> u64 {
        self.op_index(op_type)
            .and_then(|idx| self.counters[idx].slow.get(threshold_index))
            .map(AlignedCounter::get)
            .unwrap_or(0)
    }

    fn seconds_elapsed(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
