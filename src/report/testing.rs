//! Test doubles for the reporter

use crate::cluster::ShardCounter;
use crate::error::ClusterError;
use crate::stats::ResultsView;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Counters with fixed values
#[derive(Debug, Default)]
pub struct FixedResults {
    initial_count: u64,
    seconds: AtomicU64,
    done: HashMap<String, u64>,
    slow: HashMap<String, Vec<u64>>,
    rates: HashMap<String, u64>,
    interval_reads: AtomicUsize,
}

impl FixedResults {
    pub fn new(initial_count: u64, seconds: u64) -> Self {
        Self {
            initial_count,
            seconds: AtomicU64::new(seconds),
            ..Default::default()
        }
    }

    pub fn with_op(mut self, op_type: &str, done: u64, slow: &[u64], rate: u64) -> Self {
        self.done.insert(op_type.to_string(), done);
        self.slow.insert(op_type.to_string(), slow.to_vec());
        self.rates.insert(op_type.to_string(), rate);
        self
    }

    pub fn set_seconds(&self, seconds: u64) {
        self.seconds.store(seconds, Ordering::Relaxed);
    }

    pub fn interval_reads(&self) -> usize {
        self.interval_reads.load(Ordering::Relaxed)
    }
}

impl ResultsView for FixedResults {
    fn initial_count(&self) -> u64 {
        self.initial_count
    }

    fn ops_done(&self, op_type: &str) -> u64 {
        self.done.get(op_type).copied().unwrap_or(0)
    }

    fn ops_per_second_last_interval(&self) -> HashMap<String, u64> {
        self.interval_reads.fetch_add(1, Ordering::Relaxed);
        self.rates.clone()
    }

    fn slow_ops(&self, op_type: &str, threshold_index: usize) -> u64 {
        self.slow
            .get(op_type)
            .and_then(|s| s.get(threshold_index))
            .copied()
            .unwrap_or(0)
    }

    fn seconds_elapsed(&self) -> u64 {
        self.seconds.load(Ordering::Relaxed)
    }
}

/// Shard counter that answers from a queue of canned replies
#[derive(Debug, Default)]
pub struct ScriptedShards {
    replies: Mutex<Vec<Result<u32, String>>>,
    calls: AtomicU32,
}

impl ScriptedShards {
    /// Replies are handed out in order; the last one repeats
    pub fn new(replies: Vec<Result<u32, String>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ShardCounter for ScriptedShards {
    fn count_shards(&self) -> Result<u32, ClusterError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies.first().cloned().unwrap_or(Ok(1))
        };
        reply.map_err(ClusterError::Query)
    }
}

/// Console sink that can be read back after the reporter writes to it
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
