#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Structure | Description | Best Use Case |
//! |-----------|-------------|---------------|
//! | [`LruCache`] | Bounded map, evicts the least recently used entry | Memoization, hot-set caching |
//! | [`PriorityQueue`] | Binary heap, min- or max-first | Schedulers, top-k, event queues |
//!
//! ## Performance Characteristics
//!
//! | Structure | Insert | Lookup / Peek | Remove / Pop | Memory/Entry |
//! |-----------|--------|---------------|--------------|--------------|
//! | LRU       | O(1)   | O(1)          | O(1)         | key twice + 2 indices + map slot |
//! | Heap      | O(log n) | O(1)        | O(log n)     | payload + priority |
//!
//! ## Code Examples
//!
//! ### LRU (Least Recently Used)
//!
//! ```rust
//! use algokit::LruCache;
//! use algokit::config::LruCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(2).unwrap(),
//! };
//! let mut cache = LruCache::init(config, None);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" becomes most recently used
//! cache.put("c", 3);    // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### Priority Queue
//!
//! ```rust
//! use algokit::{HeapOrder, PriorityQueue};
//!
//! let mut queue = PriorityQueue::new(HeapOrder::Max);
//! queue.push("minor", 1);
//! queue.push("critical", 10);
//! queue.push("major", 5);
//!
//! assert_eq!(queue.drain_sorted(), vec!["critical", "major", "minor"]);
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature for a thread-safe LRU:
//!
//! ```toml
//! [dependencies]
//! algokit = { version = "0.1", features = ["concurrent"] }
//! ```
//!
//! ```rust
//! # #[cfg(feature = "concurrent")]
//! # {
//! use algokit::ConcurrentLruCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ConcurrentLruCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! // Safe to share across threads
//! let cache_clone = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     cache_clone.put("key".to_string(), 42);
//! })
//! .join()
//! .unwrap();
//! assert_eq!(cache.get("key"), Some(42));
//! # }
//! ```
//!
//! The concurrent cache uses **lock striping**:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │              ConcurrentLruCache (16 segments)                      │
//! │                                                                    │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐     ┌─────────┐              │
//! │  │Segment 0│ │Segment 1│ │Segment 2│ ... │Segment15│              │
//! │  │ [Mutex] │ │ [Mutex] │ │ [Mutex] │     │ [Mutex] │              │
//! │  └─────────┘ └─────────┘ └─────────┘     └─────────┘              │
//! │       ▲           ▲           ▲               ▲                   │
//! │       │           │           │               │                   │
//! │  hash(k1)%16  hash(k2)%16  hash(k3)%16   hash(kN)%16              │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recency is tracked per segment, so eviction is approximately LRU across
//! the whole cache.
//!
//! ## Modules
//!
//! - [`lru`]: Least Recently Used cache implementation
//! - [`priority_queue`]: Binary heap priority queue
//! - [`config`]: Configuration structures
//! - [`error`]: Error types
//! - [`metrics`]: Counters and the [`Metrics`](metrics::Metrics) reporting trait
//! - `concurrent`: Thread-safe sharded LRU cache (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown"), test))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Error types returned by constructors and by the priority queue.
pub mod error;

/// Index-linked doubly linked list backing the LRU cache.
///
/// Internal infrastructure: nodes live in a single arena and are addressed by
/// slot index, which keeps the cache free of raw pointers.
pub(crate) mod list;

/// Configuration structures.
pub mod config;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Binary heap priority queue with a configurable min/max ordering.
pub mod priority_queue;

/// Metrics system.
///
/// Each structure tracks its own counters and reports them through the common
/// [`Metrics`](metrics::Metrics) trait.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Partitions the key space across segments, each protected by its own lock.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::{ConfigError, EmptyQueueError};
pub use lru::LruCache;
pub use metrics::Metrics;
pub use priority_queue::{HeapOrder, PriorityQueue};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentLruCache;
