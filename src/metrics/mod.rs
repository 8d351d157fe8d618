//! Metrics System
//!
//! Provides counters for the cache and the priority queue, reported through a
//! common [`Metrics`] trait as a `BTreeMap<String, f64>`.
//!
//! # Why BTreeMap over HashMap?
//!
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and benchmarking comparisons
//! - **Stable serialization**: CSV exports have predictable column ordering
//!
//! The cost (O(log n) vs O(1)) is negligible with about a dozen keys.
//!
//! Counters are plain `u64` fields updated through `&mut self`; like the
//! structures that own them, they are not synchronized.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod lru;
pub mod priority_queue;

pub use lru::LruCacheMetrics;
pub use priority_queue::PriorityQueueMetrics;

/// Counters shared by every cache implementation.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`/`get_mut`) made to the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of new keys inserted
    pub insertions: u64,

    /// Number of `put` calls that overwrote an existing key
    pub updates: u64,

    /// Number of entries evicted because the cache was full
    pub evictions: u64,

    /// Number of entries removed explicitly (`remove`, `pop_lru`)
    pub removals: u64,

    /// Number of `clear` calls
    pub clears: u64,

    /// Current number of entries
    pub entries: u64,

    /// Maximum number of entries
    pub capacity: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for a cache of the given capacity
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Records a cache hit.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a cache miss.
    ///
    /// Misses are not stored; they are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records the insertion of a new key.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
        self.entries += 1;
    }

    /// Records an in-place overwrite of an existing key.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a capacity-driven eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
        self.entries = self.entries.saturating_sub(1);
    }

    /// Records an explicit removal.
    pub fn record_removal(&mut self) {
        self.removals += 1;
        self.entries = self.entries.saturating_sub(1);
    }

    /// Records that every entry was dropped at once.
    pub fn record_clear(&mut self) {
        self.clears += 1;
        self.entries = 0;
    }

    /// Number of lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Hit rate between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Miss rate between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of capacity currently in use
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.entries as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Adds another set of counters into this one. Used to total up the
    /// segments of a sharded cache.
    pub fn merge(&mut self, other: &CoreCacheMetrics) {
        self.requests += other.requests;
        self.cache_hits += other.cache_hits;
        self.insertions += other.insertions;
        self.updates += other.updates;
        self.evictions += other.evictions;
        self.removals += other.removals;
        self.clears += other.clears;
        self.entries += other.entries;
        self.capacity += other.capacity;
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Basic counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        // Occupancy
        metrics.insert("entries".to_string(), self.entries as f64);
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("utilization".to_string(), self.utilization());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics interface for every structure in the crate.
///
/// The simulator and the demos use it to print and export counters without
/// knowing which structure produced them.
pub trait Metrics {
    /// Returns all metrics as key-value pairs, keys sorted alphabetically.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name identifying the structure (e.g. "LRU", "MinHeap").
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_rates() {
        let mut m = CoreCacheMetrics::new(4);
        assert_eq!(m.hit_rate(), 0.0);
        m.record_hit();
        m.record_hit();
        m.record_hit();
        m.record_miss();
        assert_eq!(m.requests, 4);
        assert_eq!(m.cache_misses(), 1);
        assert_eq!(m.hit_rate(), 0.75);
        assert_eq!(m.miss_rate(), 0.25);
    }

    #[test]
    fn test_core_metrics_occupancy() {
        let mut m = CoreCacheMetrics::new(2);
        m.record_insertion();
        m.record_insertion();
        assert_eq!(m.utilization(), 1.0);
        m.record_eviction();
        m.record_removal();
        assert_eq!(m.entries, 0);
        m.record_removal();
        assert_eq!(m.entries, 0);
    }

    #[test]
    fn test_core_metrics_btreemap_is_sorted() {
        let mut m = CoreCacheMetrics::new(1);
        m.record_miss();
        let map = m.to_btreemap();
        let keys: alloc::vec::Vec<_> = map.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(map.get("eviction_rate"), Some(&0.0));
    }

    #[test]
    fn test_core_metrics_merge_recomputes_rates() {
        let mut a = CoreCacheMetrics::new(2);
        a.record_hit();
        let mut b = CoreCacheMetrics::new(2);
        b.record_miss();
        b.record_miss();
        b.record_miss();
        a.merge(&b);
        assert_eq!(a.requests, 4);
        assert_eq!(a.capacity, 4);
        assert_eq!(a.hit_rate(), 0.25);
    }

    #[test]
    fn test_clear_is_counted_and_merged() {
        let mut a = CoreCacheMetrics::new(4);
        a.record_insertion();
        a.record_insertion();
        a.record_clear();
        assert_eq!(a.clears, 1);
        assert_eq!(a.entries, 0);

        let mut b = CoreCacheMetrics::new(4);
        b.record_clear();
        a.merge(&b);
        assert_eq!(a.to_btreemap()["clears"], 2.0);
    }
}
