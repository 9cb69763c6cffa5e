//! pocreport - Progress reporter for database load tests
//!
//! pocreport samples the shared counters of a running load test and renders
//! them periodically to the console and to an optional append-only CSV log,
//! followed by a cumulative summary when the test ends.
//!
//! # Architecture
//!
//! - **Shared counters**: lock-free per-operation counters and slow-op buckets
//! - **Reporter**: header, periodic report and final summary
//! - **Two channels**: console text and CSV, rendered from one snapshot
//! - **Cluster handle**: optional shard-count refresh for sharded clusters
//! - **Schedule**: timer-driven loop with at most one report in flight

pub mod cluster;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod schedule;
pub mod stats;
pub mod util;

// Re-export commonly used types
pub use cluster::{ShardCounter, StaticShardCounter};
pub use config::ReportOptions;
pub use error::{ClusterError, ReportError};
pub use report::Reporter;
pub use stats::{ResultsView, TestResults};

/// Result type used throughout pocreport
pub type Result<T> = anyhow::Result<T>;
