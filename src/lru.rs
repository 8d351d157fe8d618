//! Least Recently Used (LRU) Cache Implementation
//!
//! A bounded key-value cache with O(1) lookups and insertions that evicts the
//! least recently used entry when it runs out of room.
//!
//! # Algorithm
//!
//! Entries are kept in a doubly linked list ordered by recency (front = most
//! recently used) and indexed by a hash map from key to list node. A hit
//! re-links the node at the front; an insertion into a full cache drops the
//! node at the back.
//!
//! ```text
//!   map: HashMap<K, EntryId>
//!      "c" ──┐   "a" ──┐        "b" ──┐
//!            ▼         ▼              ▼
//!   HEAD ⇄ ("c",3) ⇄ ("a",1) ⇄ ... ⇄ ("b",2) ⇄ TAIL
//!          most recent                least recent (evicted next)
//! ```
//!
//! The list is an index-linked arena (see `list.rs`): nodes are owned by a
//! single `Vec` and the map stores slot indices, so there is no `unsafe` and
//! no node is reachable from outside the cache.
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Put: O(1) amortized
//! - Remove: O(1)
//! - Space: O(capacity); two sentinel slots plus one slot per entry
//!
//! # Thread Safety
//!
//! `LruCache` is not thread-safe. Even `get` mutates the recency order, so
//! shared use needs `&mut` access through a `Mutex` (or the sharded
//! `ConcurrentLruCache` behind the `concurrent` feature).

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::ConfigError;
use crate::list::{self, EntryId, List};
use crate::metrics::{LruCacheMetrics, Metrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU segment containing the actual cache algorithm.
///
/// Shared between `LruCache` (single-threaded) and `ConcurrentLruCache`
/// (one segment per shard).
///
/// Invariant: `map` and `list` hold exactly the same keys, and every id in
/// `map` names the live list node carrying that key.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List<(K, V)>,
    map: HashMap<K, EntryId, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        let config = LruCacheConfig::new(cap);
        LruSegment {
            config,
            list: List::new(cap),
            map: HashMap::with_capacity_and_hasher(cap.get(), hash_builder),
            metrics: LruCacheMetrics::new(cap.get() as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    /// Looks up `key` and, on a hit, makes it the most recently used entry.
    fn touch<Q>(&mut self, key: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(id) = self.map.get(key).copied() else {
            self.metrics.core.record_miss();
            return None;
        };
        if self.list.is_front(id) {
            self.metrics.record_head_hit();
        } else {
            self.list.move_to_front(id);
        }
        self.metrics.core.record_hit();
        Some(id)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.list.get_value(id).map(|(_, v)| v)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        self.list.get_value_mut(id).map(|(_, v)| v)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.get(key).copied()?;
        self.list.get_value(id).map(|(_, v)| v)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns the replaced pair when `key` was present, otherwise the evicted
    /// pair when the insertion pushed out the least recently used entry.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(&id) = self.map.get(&key) {
            self.list.move_to_front(id);
            self.metrics.core.record_update();
            return self.list.update(id, (key, value));
        }

        // A full list refuses `add`, so make room first. The new entry goes to
        // the front and can never be its own eviction victim.
        let mut evicted = None;
        if self.list.is_full() {
            if let Some((old_key, old_value)) = self.list.remove_last() {
                self.map.remove(&old_key);
                self.metrics.core.record_eviction();
                evicted = Some((old_key, old_value));
            }
        }

        if let Some(id) = self.list.add((key.clone(), value)) {
            self.map.insert(key, id);
            self.metrics.core.record_insertion();
        }

        evicted
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        let (_, value) = self.list.remove(id)?;
        self.metrics.core.record_removal();
        Some(value)
    }

    pub(crate) fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.remove_last()?;
        self.map.remove(&key);
        self.metrics.core.record_removal();
        Some((key, value))
    }

    pub(crate) fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|(k, v)| (k, v))
    }

    pub(crate) fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.front().map(|(k, v)| (k, v))
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        self.metrics.core.record_clear();
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Panics if the map and the list disagree.
    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        assert_eq!(self.map.len(), self.list.len());
        assert!(self.list.len() <= self.cap().get());
        assert_eq!(self.list.iter().count(), self.list.len());
        for (key, _) in self.list.iter() {
            let id = self.map.get(key).copied().expect("list key missing from map");
            let (stored, _) = self.list.get_value(id).expect("map id is not live");
            assert!(stored == key, "map id points at a different key");
        }
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity())
            .field("len", &self.map.len())
            .finish()
    }
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache has a fixed, positive capacity and supports O(1) operations for
/// inserting, retrieving, and updating entries. When an insertion would exceed
/// the capacity, the least recently used entry is evicted.
///
/// # Examples
///
/// ```
/// use algokit::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut sessions = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// sessions.put("alice", 1001);
/// sessions.put("bob", 1002);
///
/// // A lookup makes "alice" the most recently used session
/// assert_eq!(sessions.get("alice"), Some(&1001));
///
/// // The third session pushes out "bob", the least recently used one
/// assert_eq!(sessions.put("carol", 1003), Some(("bob", 1002)));
/// assert!(!sessions.contains("bob"));
/// assert_eq!(sessions.peek_mru(), Some((&"carol", &1003)));
/// assert_eq!(sessions.peek_lru(), Some((&"alice", &1001)));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K, V, S> core::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.segment.config.capacity())
            .field("len", &self.segment.map.len())
            .finish()
    }
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache from an integer capacity, rejecting zero.
    ///
    /// ```
    /// use algokit::error::ConfigError;
    /// use algokit::LruCache;
    ///
    /// assert!(LruCache::<u32, u32>::try_new(8).is_ok());
    /// assert_eq!(LruCache::<u32, u32>::try_new(0).unwrap_err(), ConfigError::ZeroCapacity);
    /// ```
    pub fn try_new(cap: usize) -> Result<Self, ConfigError> {
        let config = LruCacheConfig::try_new(cap)?;
        Ok(Self::init(config, None))
    }

    /// Creates a new LRU cache from a configuration with an optional hasher.
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        LruCache::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: LruSegment::with_hasher(cap, hash_builder),
        }
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Returns the current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// `None` means the key is not cached. This is a read with a side
    /// effect: a hit reorders the recency list.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Mutable variant of [`get`](Self::get).
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without touching the recency order.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is cached. Does not touch the recency order.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Removes `key` and returns its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes and returns the least recently used entry.
    #[inline]
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        self.segment.pop_lru()
    }

    /// Returns the entry that would be evicted next, without touching it.
    #[inline]
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.segment.peek_lru()
    }

    /// Returns the most recently used entry, without touching it.
    #[inline]
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.segment.peek_mru()
    }

    /// Removes every entry. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.segment.iter()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts `value` under `key` and marks it most recently used.
    ///
    /// - If `key` was present its value is overwritten and the old pair is
    ///   returned. Nothing is evicted.
    /// - Otherwise, if the cache was full, the least recently used pair is
    ///   evicted and returned.
    /// - Otherwise returns `None`.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Metrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Iterator over cache entries, most recently used first.
///
/// Created by [`LruCache::iter`]. Iterating does not change recency.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> core::fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}
