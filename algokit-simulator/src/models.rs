// Data models for trace simulation

use algokit::HeapOrder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// A single request read from a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Timestamp of the request
    pub timestamp: SystemTime,
    /// Cache key, also used as the queue payload
    pub key: String,
    /// Scheduling priority (lower is more urgent for a min-queue)
    pub priority: u32,
}

impl Request {
    /// Create a new request
    pub fn new(timestamp: SystemTime, key: String, priority: u32) -> Self {
        Self {
            timestamp,
            key,
            priority,
        }
    }
}

/// Cache flavour replayed by the LRU workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheMode {
    /// Single-threaded `LruCache`
    Sequential,
    /// Lock-striped `ConcurrentLruCache`
    Concurrent,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Sequential => "seq",
            CacheMode::Concurrent => "conc",
        }
    }

    pub fn all() -> Vec<CacheMode> {
        vec![CacheMode::Sequential, CacheMode::Concurrent]
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the scheduler workload on `PriorityQueue`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueWorkloadConfig {
    /// Which end of the priority range is popped first
    pub order: HeapOrder,
    /// Pop one item after every `pop_every` pushes
    pub pop_every: NonZeroUsize,
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Directory containing input trace files
    pub input_dir: PathBuf,
    /// Cache capacity in number of entries
    pub capacity: NonZeroUsize,
    /// LRU modes to replay
    pub modes: Vec<CacheMode>,
    /// Number of segments for the concurrent cache (None = library default)
    pub segment_count: Option<usize>,
    /// Replay the trace against the `lru` crate and compare hit counts
    pub verify_reference: bool,
    /// Scheduler workload, or None to skip it
    pub queue: Option<QueueWorkloadConfig>,
}

/// Results of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// LRU statistics for each replayed mode
    pub lru: BTreeMap<CacheMode, LruRunStats>,
    /// Hit counts of the `lru` crate on the same trace
    pub reference: Option<ReferenceStats>,
    /// Scheduler workload statistics
    pub queue: Option<QueueRunStats>,
    /// Total number of requests in the trace
    pub total_requests: u64,
    /// Number of distinct keys in the trace
    pub unique_keys: usize,
    /// Wall-clock duration of all replays
    pub duration: Duration,
    /// Cache capacity used
    pub capacity: usize,
}

/// Statistics for one LRU replay
#[derive(Debug, Default, Clone)]
pub struct LruRunStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out by a put on a full cache (or full segment)
    pub evictions: u64,
    /// Entries left in the cache after the replay
    pub final_len: usize,
    /// Replay time in milliseconds (includes I/O)
    pub wall_time_ms: u64,
    /// Latency of the cache operations alone
    pub latency: LatencyStats,
}

impl LruRunStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        percentage(self.hits, self.hits + self.misses)
    }
}

/// Outcome of replaying the trace against the `lru` crate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceStats {
    pub hits: u64,
    pub misses: u64,
}

impl ReferenceStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        percentage(self.hits, self.hits + self.misses)
    }

    /// True if a replay saw exactly the same hits and misses
    pub fn agrees_with(&self, run: &LruRunStats) -> bool {
        self.hits == run.hits && self.misses == run.misses
    }
}

/// Statistics for the scheduler workload
#[derive(Debug, Clone)]
pub struct QueueRunStats {
    pub order: HeapOrder,
    pub pushes: u64,
    /// Pops interleaved with pushes
    pub pops: u64,
    /// Pops made while draining the queue at the end
    pub drained: u64,
    /// Pops whose priority came out of order
    pub ordering_violations: u64,
    /// Largest number of queued items observed
    pub peak_len: usize,
    /// Replay time in milliseconds (includes I/O)
    pub wall_time_ms: u64,
    pub push_stats: OpLatencyStats,
    pub pop_stats: OpLatencyStats,
}

impl QueueRunStats {
    pub fn new(order: HeapOrder) -> Self {
        Self {
            order,
            pushes: 0,
            pops: 0,
            drained: 0,
            ordering_violations: 0,
            peak_len: 0,
            wall_time_ms: 0,
            push_stats: OpLatencyStats::default(),
            pop_stats: OpLatencyStats::default(),
        }
    }

    pub fn order_str(&self) -> &'static str {
        match self.order {
            HeapOrder::Min => "min",
            HeapOrder::Max => "max",
        }
    }
}

/// Latency statistics for a single operation type
#[derive(Debug, Clone, Default)]
pub struct OpLatencyStats {
    /// Total time spent (nanoseconds)
    pub total_ns: u64,
    /// Number of operations
    pub count: u64,
    /// Minimum latency (nanoseconds)
    pub min_ns: u64,
    /// Maximum latency (nanoseconds)
    pub max_ns: u64,
    /// Latency percentiles
    pub percentiles: Option<LatencyPercentiles>,
}

impl OpLatencyStats {
    /// Calculate average latency in nanoseconds
    pub fn avg_ns(&self) -> f64 {
        if self.count > 0 {
            self.total_ns as f64 / self.count as f64
        } else {
            0.0
        }
    }

    /// Calculate throughput in operations per second
    pub fn ops_per_sec(&self) -> f64 {
        if self.total_ns > 0 {
            (self.count as f64 * 1_000_000_000.0) / self.total_ns as f64
        } else {
            0.0
        }
    }

    /// Get total duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.total_ns as f64 / 1_000_000_000.0
    }

    pub fn p50_ns(&self) -> u64 {
        self.percentiles.as_ref().map(|p| p.p50_ns).unwrap_or(0)
    }

    pub fn p99_ns(&self) -> u64 {
        self.percentiles.as_ref().map(|p| p.p99_ns).unwrap_or(0)
    }
}

/// Latency statistics for the LRU get/put pair
#[derive(Debug, Clone, Default)]
pub struct LatencyStats {
    /// Total time spent in all cache operations (nanoseconds)
    pub total_ns: u64,
    /// Total number of operations
    pub count: u64,
    pub get_stats: OpLatencyStats,
    pub put_stats: OpLatencyStats,
}

impl LatencyStats {
    /// Calculate average latency in nanoseconds (across all operations)
    pub fn avg_ns(&self) -> f64 {
        if self.count > 0 {
            self.total_ns as f64 / self.count as f64
        } else {
            0.0
        }
    }

    /// Calculate throughput in operations per second (all operations)
    pub fn ops_per_sec(&self) -> f64 {
        if self.total_ns > 0 {
            (self.count as f64 * 1_000_000_000.0) / self.total_ns as f64
        } else {
            0.0
        }
    }

    /// Get total duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.total_ns as f64 / 1_000_000_000.0
    }
}

/// Latency percentiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyPercentiles {
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
    pub p999_ns: u64,
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// CSV export row for simulation results.
///
/// Columns that do not apply to a workload are left empty.
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub workload: String,
    pub mode: String,
    pub requests: u64,
    pub hits: Option<u64>,
    pub misses: Option<u64>,
    pub hit_rate: Option<f64>,
    pub evictions: Option<u64>,
    pub ordering_violations: Option<u64>,
    pub peak_len: Option<usize>,
    pub wall_time_ms: Option<u64>,
    /// get for LRU rows, push for queue rows
    pub primary_op: String,
    pub primary_ops: Option<u64>,
    pub primary_avg_ns: Option<f64>,
    pub primary_p50_ns: Option<u64>,
    pub primary_p99_ns: Option<u64>,
    /// put for LRU rows, pop for queue rows
    pub secondary_op: String,
    pub secondary_ops: Option<u64>,
    pub secondary_avg_ns: Option<f64>,
    pub secondary_p50_ns: Option<u64>,
    pub secondary_p99_ns: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_is_a_percentage() {
        let stats = LruRunStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(LruRunStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_reference_agreement() {
        let run = LruRunStats {
            hits: 10,
            misses: 5,
            ..Default::default()
        };
        assert!(ReferenceStats { hits: 10, misses: 5 }.agrees_with(&run));
        assert!(!ReferenceStats { hits: 9, misses: 6 }.agrees_with(&run));
    }

    #[test]
    fn test_op_latency_without_samples() {
        let stats = OpLatencyStats {
            total_ns: 2_000,
            count: 4,
            ..Default::default()
        };
        assert_eq!(stats.avg_ns(), 500.0);
        assert_eq!(stats.ops_per_sec(), 2_000_000.0);
        assert_eq!(stats.p99_ns(), 0);
    }

    #[test]
    fn test_cache_modes_sort_sequential_first() {
        let mut modes = vec![CacheMode::Concurrent, CacheMode::Sequential];
        modes.sort();
        assert_eq!(modes, CacheMode::all());
        assert_eq!(CacheMode::Concurrent.to_string(), "conc");
    }
}
