//! Cluster metadata queries
//!
//! The reporter only needs one fact from the cluster: how many shards it
//! currently has. The database driver lives in the surrounding harness and
//! is plugged in through [`ShardCounter`].

use crate::error::ClusterError;

/// Handle able to count the shards of a cluster
///
/// Implementations typically count the documents of the cluster's shard
/// registry collection.
pub trait ShardCounter: Send + Sync {
    /// Current number of shards
    fn count_shards(&self) -> Result<u32, ClusterError>;
}

/// Shard counter answering a fixed value
///
/// Used for single-server deployments and when no driver is wired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticShardCounter(pub u32);

impl ShardCounter for StaticShardCounter {
    fn count_shards(&self) -> Result<u32, ClusterError> {
        Ok(self.0)
    }
}

impl<T: ShardCounter + ?Sized> ShardCounter for std::sync::Arc<T> {
    fn count_shards(&self) -> Result<u32, ClusterError> {
        (**self).count_shards()
    }
}
