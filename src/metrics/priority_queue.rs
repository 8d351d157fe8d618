//! Priority Queue Metrics
//!
//! Counters for the binary-heap priority queue. Sift step counts make it easy
//! to confirm the O(log n) bound on real workloads: `sift_swaps / pushes` stays
//! close to `log2(peak_len)` or below.

extern crate alloc;

use super::Metrics;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Metrics tracked by a [`PriorityQueue`](crate::PriorityQueue).
#[derive(Debug, Default, Clone)]
pub struct PriorityQueueMetrics {
    /// Number of items pushed
    pub pushes: u64,
    /// Number of items popped
    pub pops: u64,
    /// Number of `pop` calls made on an empty queue
    pub empty_accesses: u64,
    /// Total parent/child swaps performed while sifting
    pub sift_swaps: u64,
    /// Current number of items
    pub len: u64,
    /// Largest number of items held at once
    pub peak_len: u64,
    /// Number of `clear` calls
    pub clears: u64,
    /// Whether the queue pops its largest priority first
    pub max_first: bool,
}

impl PriorityQueueMetrics {
    /// Creates zeroed metrics for a queue of the given direction.
    pub fn new(max_first: bool) -> Self {
        Self {
            max_first,
            ..Default::default()
        }
    }

    /// Records a push.
    pub fn record_push(&mut self) {
        self.pushes += 1;
        self.len += 1;
        self.peak_len = self.peak_len.max(self.len);
    }

    /// Records a pop.
    pub fn record_pop(&mut self) {
        self.pops += 1;
        self.len = self.len.saturating_sub(1);
    }

    /// Records a `pop` that failed because the queue was empty.
    pub fn record_empty_access(&mut self) {
        self.empty_accesses += 1;
    }

    /// Records `n` swaps made by one sift operation.
    pub fn record_sift(&mut self, swaps: u64) {
        self.sift_swaps += swaps;
    }

    /// Records that the queue was cleared.
    pub fn record_clear(&mut self) {
        self.clears += 1;
        self.len = 0;
    }

    /// Adds another queue's counters into this one. `peak_len` keeps the
    /// larger high-water mark.
    pub fn merge(&mut self, other: &PriorityQueueMetrics) {
        self.pushes += other.pushes;
        self.pops += other.pops;
        self.empty_accesses += other.empty_accesses;
        self.sift_swaps += other.sift_swaps;
        self.clears += other.clears;
        self.len += other.len;
        self.peak_len = self.peak_len.max(other.peak_len).max(self.len);
    }

    /// Average swaps per mutating operation.
    pub fn avg_sift_swaps(&self) -> f64 {
        let ops = self.pushes + self.pops;
        if ops > 0 {
            self.sift_swaps as f64 / ops as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("avg_sift_swaps".to_string(), self.avg_sift_swaps());
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("empty_accesses".to_string(), self.empty_accesses as f64);
        metrics.insert("len".to_string(), self.len as f64);
        metrics.insert("peak_len".to_string(), self.peak_len as f64);
        metrics.insert("pops".to_string(), self.pops as f64);
        metrics.insert("pushes".to_string(), self.pushes as f64);
        metrics.insert("sift_swaps".to_string(), self.sift_swaps as f64);
        metrics
    }
}

impl Metrics for PriorityQueueMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        if self.max_first {
            "MaxHeap"
        } else {
            "MinHeap"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_len_tracks_high_water_mark() {
        let mut m = PriorityQueueMetrics::new(false);
        m.record_push();
        m.record_push();
        m.record_pop();
        m.record_push();
        assert_eq!(m.len, 2);
        assert_eq!(m.peak_len, 2);
        assert_eq!(m.algorithm_name(), "MinHeap");
    }

    #[test]
    fn test_avg_sift_swaps() {
        let mut m = PriorityQueueMetrics::new(true);
        assert_eq!(m.avg_sift_swaps(), 0.0);
        m.record_push();
        m.record_sift(3);
        m.record_push();
        m.record_sift(1);
        assert_eq!(m.avg_sift_swaps(), 2.0);
        assert_eq!(m.metrics().get("sift_swaps"), Some(&4.0));
    }

    #[test]
    fn test_merge_sums_counters() {
        let mut a = PriorityQueueMetrics::new(false);
        for _ in 0..3 {
            a.record_push();
        }
        a.record_pop();
        a.record_sift(2);

        let mut b = PriorityQueueMetrics::new(false);
        for _ in 0..4 {
            b.record_push();
        }
        b.record_empty_access();
        b.record_clear();

        a.merge(&b);
        assert_eq!(a.pushes, 7);
        assert_eq!(a.pops, 1);
        assert_eq!(a.empty_accesses, 1);
        assert_eq!(a.sift_swaps, 2);
        assert_eq!(a.clears, 1);
        assert_eq!(a.len, 2);
        assert_eq!(a.peak_len, 4);
    }
}
