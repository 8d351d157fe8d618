//! Concurrent Cache Implementations
//!
//! Thread-safe caches built from the single-threaded segments using lock
//! striping.
//!
//! # Architecture
//!
//! - The key space is partitioned across segments by hash
//! - Each segment is an independent LRU behind its own `parking_lot::Mutex`
//! - Operations lock only the segment that owns the key
//!
//! ## Why Mutex Instead of RwLock?
//!
//! An LRU `get` re-links the entry at the front of the recency list, so every
//! access is a write. An `RwLock` would take the exclusive side on every call
//! anyway, and `parking_lot::Mutex` is cheaper than that.
//!
//! Concurrency comes from **segmentation** instead: different keys can be
//! accessed in parallel as long as they hash to different segments.
//!
//! # Available Concurrent Caches
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConcurrentLruCache`] | Thread-safe LRU cache with segmented storage |
//!
//! # Zero-Copy Access
//!
//! `get` clones the value so the lock is released before returning. Use
//! `get_with()` to work on the value while the segment lock is held:
//!
//! ```rust
//! use algokit::ConcurrentLruCache;
//! use core::num::NonZeroUsize;
//!
//! let cache = ConcurrentLruCache::new(NonZeroUsize::new(64).unwrap());
//! cache.put("greeting", String::from("hello"));
//! let len = cache.get_with(&"greeting", |value| value.len());
//! assert_eq!(len, Some(5));
//! ```

mod lru;

pub use self::lru::ConcurrentLruCache;

/// Returns the default number of segments.
#[inline]
pub fn default_segment_count() -> usize {
    16
}
