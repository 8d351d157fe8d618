//! Sharded LRU cache
//!
//! [`ConcurrentLruCache`] spreads its entries over several independent
//! [`LruCache`](crate::LruCache) segments, each behind its own
//! `parking_lot::Mutex`. A key always lands in the segment picked by
//! `hash(key) % segment_count`, so two threads only contend when their keys
//! share a segment.
//!
//! ```text
//!   put("user:7")        get("user:42")
//!        │                     │
//!   hash % 4 = 1          hash % 4 = 3
//!        ▼                     ▼
//!   [seg 0] [seg 1] [seg 2] [seg 3]
//!            lock            lock
//! ```
//!
//! ## Capacity Split
//!
//! The total capacity is split as evenly as possible: with capacity `C` and
//! `N` segments, the first `C % N` segments hold one extra entry. When `N`
//! exceeds `C` only `C` segments are created. The sum of the segment
//! capacities always equals `C`.
//!
//! ## Trade-offs
//!
//! LRU ordering is per segment, not global. An entry can be evicted from one
//! segment while another segment holds older entries. When strict global
//! ordering matters use `Mutex<LruCache>`.
//!
//! # Example
//!
//! ```rust
//! use algokit::ConcurrentLruCache;
//! use algokit::config::{ConcurrentCacheConfig, ConcurrentLruCacheConfig, LruCacheConfig};
//! use std::num::NonZeroUsize;
//! use std::thread;
//!
//! let config: ConcurrentLruCacheConfig = ConcurrentCacheConfig {
//!     base: LruCacheConfig {
//!         capacity: NonZeroUsize::new(10_000).unwrap(),
//!     },
//!     segments: 16,
//! };
//! let cache = ConcurrentLruCache::init(config, None).unwrap();
//!
//! thread::scope(|scope| {
//!     for worker in 0..4u32 {
//!         let cache = &cache;
//!         scope.spawn(move || {
//!             for user in 0..1000u32 {
//!                 cache.put(worker * 1000 + user, user % 7);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(cache.len(), 4000);
//! ```

extern crate alloc;

use crate::config::ConcurrentLruCacheConfig;
use crate::error::ConfigError;
use crate::lru::LruSegment;
use crate::metrics::{LruCacheMetrics, Metrics};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LRU cache with segmented storage.
///
/// # Example
///
/// ```rust
/// use algokit::ConcurrentLruCache;
/// use core::num::NonZeroUsize;
/// use std::sync::Arc;
///
/// let cache = Arc::new(ConcurrentLruCache::new(NonZeroUsize::new(1000).unwrap()));
///
/// // Safe to use from multiple threads
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.get("key"), Some(42));
/// ```
pub struct ConcurrentLruCache<K, V, S = DefaultHashBuilder> {
    segments: Box<[Mutex<LruSegment<K, V, S>>]>,
    hash_builder: S,
}

impl<K, V> ConcurrentLruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a concurrent LRU cache with the default segment count.
    pub fn new(cap: NonZeroUsize) -> Self {
        let segments = NonZeroUsize::new(super::default_segment_count()).unwrap_or(NonZeroUsize::MIN);
        Self::build(cap, segments, DefaultHashBuilder::default())
    }

    /// Creates a concurrent LRU cache with an explicit segment count.
    ///
    /// Fails with [`ConfigError::ZeroSegments`] if `segments` is zero.
    pub fn with_segments(cap: NonZeroUsize, segments: usize) -> Result<Self, ConfigError> {
        let segments = NonZeroUsize::new(segments).ok_or(ConfigError::ZeroSegments)?;
        Ok(Self::build(cap, segments, DefaultHashBuilder::default()))
    }

    /// Creates a concurrent LRU cache from a configuration with an optional
    /// hasher.
    ///
    /// Fails with [`ConfigError::ZeroSegments`] if `config.segments` is zero.
    pub fn init(
        config: ConcurrentLruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    /// Creates a concurrent LRU cache with a custom hash builder.
    ///
    /// The hash builder picks the segment for each key and is cloned into
    /// every segment for its own index.
    pub fn init_with_hasher(
        config: ConcurrentLruCacheConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        let segments = NonZeroUsize::new(config.segments).ok_or(ConfigError::ZeroSegments)?;
        Ok(Self::build(config.base.capacity, segments, hash_builder))
    }

    fn build(cap: NonZeroUsize, segments: NonZeroUsize, hash_builder: S) -> Self {
        let count = segments.get().min(cap.get());
        let base = cap.get() / count;
        let extra = cap.get() % count;

        let segments: Vec<_> = (0..count)
            .map(|i| {
                let segment_cap = base + usize::from(i < extra);
                // count <= cap, so base >= 1
                let segment_cap = NonZeroUsize::new(segment_cap).unwrap_or(NonZeroUsize::MIN);
                Mutex::new(LruSegment::with_hasher(segment_cap, hash_builder.clone()))
            })
            .collect();

        Self {
            segments: segments.into_boxed_slice(),
            hash_builder,
        }
    }

    #[inline]
    fn segment_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        (self.hash_builder.hash_one(key) as usize) % self.segments.len()
    }

    /// Returns the total capacity across all segments.
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(|s| s.lock().cap().get()).sum()
    }

    /// Returns the number of segments in the cache.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the total number of entries across all segments.
    ///
    /// Segments are locked one after another, so under concurrent writes the
    /// result may be slightly stale.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.lock().is_empty())
    }

    /// Retrieves a clone of the value and marks the key most recently used
    /// within its segment.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let idx = self.segment_index(key);
        let mut segment = self.segments[idx].lock();
        segment.get(key).cloned()
    }

    /// Applies `f` to the value while holding the segment lock.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let idx = self.segment_index(key);
        let mut segment = self.segments[idx].lock();
        segment.get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value while holding the
    /// segment lock.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        let idx = self.segment_index(key);
        let mut segment = self.segments[idx].lock();
        segment.get_mut(key).map(f)
    }

    /// Returns a clone of the value without touching the recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let idx = self.segment_index(key);
        let segment = self.segments[idx].lock();
        segment.peek(key).cloned()
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the replaced pair if the key existed, otherwise the pair
    /// evicted from the key's segment, if any.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let idx = self.segment_index(&key);
        let mut segment = self.segments[idx].lock();
        segment.put(key, value)
    }

    /// Removes a key and returns its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.segment_index(key);
        let mut segment = self.segments[idx].lock();
        segment.remove(key)
    }

    /// Returns `true` if the key is cached. Does not touch the recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.segment_index(key);
        self.segments[idx].lock().contains(key)
    }

    /// Removes every entry from every segment.
    pub fn clear(&self) {
        for segment in self.segments.iter() {
            segment.lock().clear();
        }
    }
}

impl<K, V, S> Metrics for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        // Counters are summed first so the rates come out of the totals.
        let mut total = LruCacheMetrics::new(0);
        for segment in self.segments.iter() {
            total.merge(segment.lock().metrics());
        }
        total.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLRU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentLruCache")
            .field("segment_count", &self.segments.len())
            .field("total_len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConcurrentCacheConfig, LruCacheConfig};

    extern crate std;
    use std::string::ToString;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    fn make_config(capacity: usize, segments: usize) -> ConcurrentLruCacheConfig {
        ConcurrentCacheConfig {
            base: LruCacheConfig {
                capacity: NonZeroUsize::new(capacity).unwrap(),
            },
            segments,
        }
    }

    fn make_cache<V: Send>(capacity: usize, segments: usize) -> ConcurrentLruCache<String, V> {
        ConcurrentLruCache::init(make_config(capacity, segments), None).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        let cache = make_cache(64, 8);
        assert!(cache.is_empty());

        for (user, visits) in [("ada", 3), ("grace", 5), ("linus", 8)] {
            assert_eq!(cache.put(user.to_string(), visits), None);
        }
        assert_eq!(cache.len(), 3);

        assert_eq!(cache.get("grace"), Some(5));
        assert_eq!(cache.peek("linus"), Some(8));
        assert_eq!(cache.get("ken"), None);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_zero_segments_rejected() {
        let result: Result<ConcurrentLruCache<u32, u32>, _> =
            ConcurrentLruCache::init(make_config(10, 0), None);
        assert_eq!(result.unwrap_err(), ConfigError::ZeroSegments);
    }

    #[test]
    fn test_get_with_and_get_mut_with() {
        let cache = make_cache(10, 2);
        cache.put("k".to_string(), 41);
        assert_eq!(cache.get_mut_with("k", |v| { *v += 1; *v }), Some(42));
        assert_eq!(cache.get_with("k", |v| *v * 2), Some(84));
        assert_eq!(cache.get_with("missing", |v: &i32| *v), None);
    }

    #[test]
    fn test_remove_contains_clear() {
        let cache = make_cache(10, 4);
        cache.put("draft".to_string(), 0);
        cache.put("final".to_string(), 1);
        assert!(cache.contains("draft"));
        assert_eq!(cache.remove("draft"), Some(0));
        assert!(!cache.contains("draft"));
        assert_eq!(cache.remove("draft"), None);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_capacity_split_is_exact() {
        for (cap, segments) in [(100, 16), (10, 16), (1, 4), (17, 5), (16, 16)] {
            let cache: ConcurrentLruCache<String, u32> = make_cache(cap, segments);
            assert_eq!(cache.capacity(), cap);
            assert_eq!(cache.segment_count(), segments.min(cap));
        }
    }

    #[test]
    fn test_never_exceeds_total_capacity() {
        let cache = make_cache(10, 16);
        for i in 0..200 {
            cache.put(std::format!("key_{i}"), i);
            assert!(cache.len() <= 10);
        }
        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn test_update_existing_key() {
        let cache = make_cache(10, 2);
        assert_eq!(cache.put("k".to_string(), 1), None);
        assert_eq!(cache.put("k".to_string(), 2), Some(("k".to_string(), 1)));
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_ordering_within_segment() {
        // A single segment behaves like a plain LruCache
        let cache = make_cache(3, 1);
        for (i, page) in ["home", "docs", "blog"].into_iter().enumerate() {
            cache.put(page.to_string(), i);
        }
        cache.get("home");
        assert_eq!(cache.put("news".to_string(), 3), Some(("docs".to_string(), 1)));
        assert!(cache.contains("home"));
        assert!(cache.contains("blog"));
    }

    #[test]
    fn test_metrics_are_aggregated() {
        let cache = make_cache(8, 4);
        for i in 0..4 {
            cache.put(std::format!("k{i}"), i);
        }
        for i in 0..4 {
            cache.get(std::format!("k{i}").as_str());
        }
        cache.get("nope");
        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&5.0));
        assert_eq!(metrics.get("cache_hits"), Some(&4.0));
        assert_eq!(metrics.get("hit_rate"), Some(&0.8));
        assert_eq!(metrics.get("capacity"), Some(&8.0));
        assert_eq!(cache.algorithm_name(), "ConcurrentLRU");
    }

    #[test]
    fn test_threads_share_one_cache() {
        let cache: Arc<ConcurrentLruCache<String, usize>> = Arc::new(make_cache(1000, 16));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for n in 0..500 {
                        let key = std::format!("w{worker}/item{n}");
                        cache.put(key.clone(), n);
                        // Keys are private to a worker, so a hit sees its own value
                        if let Some(v) = cache.get(&key) {
                            assert_eq!(v, n);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.capacity(), 1000);
        assert!(cache.len() <= 1000);
        assert!(cache.len() >= 16);
    }

    #[test]
    fn test_scoped_pool_mixed_operations() {
        let cache: ConcurrentLruCache<u32, u32> =
            ConcurrentLruCache::init(make_config(100, 16), None).unwrap();
        let mut pool = scoped_threadpool::Pool::new(4);

        pool.scoped(|scope| {
            for worker in 0..4u32 {
                let cache = &cache;
                scope.execute(move || {
                    for step in 0..600u32 {
                        let key = (step * 7 + worker) % 150;
                        match step % 5 {
                            0 | 1 => {
                                cache.put(key, step);
                            }
                            2 => {
                                let _ = cache.get_with(&key, |v| *v + 1);
                            }
                            3 => {
                                cache.get_mut_with(&key, |v| *v = v.wrapping_add(1));
                            }
                            _ => {
                                let _ = cache.remove(&key);
                            }
                        }
                        if worker == 0 && step == 300 {
                            cache.clear();
                        }
                    }
                });
            }
        });

        assert!(cache.len() <= cache.capacity());
    }
}
