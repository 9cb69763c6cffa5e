//! Error types for reporting and cluster queries

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while writing the CSV log
///
/// These never abort a report; the reporter logs them and carries on with
/// the console output.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to open log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log file {}: {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while querying cluster metadata
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster unavailable: {0}")]
    Unavailable(String),

    #[error("shard metadata query failed: {0}")]
    Query(String),
}
