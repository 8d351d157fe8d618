//! Configuration Module
//!
//! Configuration structures for the cache and the priority queue. Each
//! structure has public fields, so it can be built with a struct literal.
//!
//! # Design Philosophy
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: An LRU capacity is a `NonZeroUsize`; zero is unrepresentable
//! - **Fallible helpers**: `try_new` constructors for values that come from input
//!
//! # Single-Threaded Configs
//!
//! | Config | Structure | Description |
//! |--------|-----------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used cache |
//! | `PriorityQueueConfig` | [`PriorityQueue`](crate::PriorityQueue) | Binary heap, min- or max-first |
//!
//! # Concurrent Configs (requires `concurrent` feature)
//!
//! `ConcurrentCacheConfig<C>` wraps a base config and adds a segment count.
//! `ConcurrentLruCacheConfig` is the alias for the LRU cache.
//!
//! # Examples
//!
//! ```
//! use algokit::config::{LruCacheConfig, PriorityQueueConfig};
//! use algokit::{HeapOrder, LruCache, PriorityQueue};
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//!
//! let queue: PriorityQueue<String, u64> = PriorityQueue::init(PriorityQueueConfig {
//!     order: HeapOrder::Min,
//!     capacity_hint: 128,
//! });
//! ```

pub mod lru;
pub mod priority_queue;

pub use lru::LruCacheConfig;
pub use priority_queue::PriorityQueueConfig;

/// Generic configuration wrapper for concurrent caches.
///
/// Wraps a base cache configuration and adds the `segments` field
/// controlling how many independently locked shards the key space is split
/// into.
///
/// The `capacity` in the base config applies to the **entire cache** and is
/// split across segments. A segment count larger than the capacity is reduced
/// to the capacity, so every segment holds at least one entry and the total
/// never exceeds `capacity`.
///
/// # Example
///
/// ```
/// use algokit::config::{ConcurrentCacheConfig, ConcurrentLruCacheConfig, LruCacheConfig};
/// use core::num::NonZeroUsize;
///
/// let config: ConcurrentLruCacheConfig = ConcurrentCacheConfig {
///     base: LruCacheConfig {
///         capacity: NonZeroUsize::new(10_000).unwrap(),
///     },
///     segments: 16,
/// };
/// assert_eq!(config.base.capacity.get(), 10_000);
/// ```
#[cfg(feature = "concurrent")]
#[derive(Clone, Copy)]
pub struct ConcurrentCacheConfig<C> {
    /// Base configuration for the underlying cache.
    pub base: C,
    /// Number of segments for sharding (more segments = less contention)
    pub segments: usize,
}

#[cfg(feature = "concurrent")]
impl<C: core::fmt::Debug> core::fmt::Debug for ConcurrentCacheConfig<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentCacheConfig")
            .field("base", &self.base)
            .field("segments", &self.segments)
            .finish()
    }
}

#[cfg(feature = "concurrent")]
/// Configuration for a concurrent LRU cache.
/// Type alias for `ConcurrentCacheConfig<LruCacheConfig>`.
pub type ConcurrentLruCacheConfig = ConcurrentCacheConfig<LruCacheConfig>;
