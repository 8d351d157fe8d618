//! LRU Cache Metrics
//!
//! Metrics specific to the LRU (Least Recently Used) cache.

extern crate alloc;

use super::{CoreCacheMetrics, Metrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LRU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone)]
pub struct LruCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,
    /// Hits that found the key already at the most-recently-used position,
    /// so no re-link was needed.
    pub head_hits: u64,
}

impl LruCacheMetrics {
    /// Creates a new LruCacheMetrics instance for a cache of the given capacity
    pub fn new(capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(capacity),
            head_hits: 0,
        }
    }

    /// Records a hit on the entry that was already most recently used.
    pub fn record_head_hit(&mut self) {
        self.head_hits += 1;
    }

    /// Adds another segment's counters into this one.
    pub fn merge(&mut self, other: &LruCacheMetrics) {
        self.core.merge(&other.core);
        self.head_hits += other.head_hits;
    }

    /// Converts LRU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("head_hits".to_string(), self.head_hits as f64);
        metrics
    }
}

impl Metrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
