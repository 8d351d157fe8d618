//! Error types for the algokit library.
//!
//! Lookups that miss are not errors: [`LruCache::get`](crate::LruCache::get)
//! returns `None`. Only two conditions are reported through `Result`:
//!
//! - [`ConfigError`]: a constructor was given parameters that would produce an
//!   unusable structure (a cache with zero capacity).
//! - [`EmptyQueueError`]: [`PriorityQueue::peek`](crate::PriorityQueue::peek)
//!   or [`PriorityQueue::pop`](crate::PriorityQueue::pop) was called on an
//!   empty queue.
//!
//! Both implement `core::fmt::Display`, and `std::error::Error` when the `std`
//! feature is enabled.
//!
//! ```
//! use algokit::error::{ConfigError, EmptyQueueError};
//! use algokit::{LruCache, PriorityQueue};
//!
//! let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
//! assert_eq!(err, ConfigError::ZeroCapacity);
//!
//! let mut queue: PriorityQueue<&str, u32> = PriorityQueue::min();
//! assert_eq!(queue.pop(), Err(EmptyQueueError));
//! ```

use core::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested capacity was zero. A cache must hold at least one entry.
    ZeroCapacity,
    /// A concurrent cache was configured with zero segments.
    ZeroSegments,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => f.write_str("capacity must be greater than zero"),
            ConfigError::ZeroSegments => f.write_str("segment count must be greater than zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// EmptyQueueError
// ---------------------------------------------------------------------------

/// Error returned by `peek`/`pop` on a queue with no items.
///
/// Callers can avoid it by checking [`PriorityQueue::is_empty`](crate::PriorityQueue::is_empty)
/// first, or handle it after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyQueueError;

impl fmt::Display for EmptyQueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no items are in the queue")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EmptyQueueError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[test]
    fn config_display_mentions_capacity() {
        let err = ConfigError::ZeroCapacity;
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn config_display_mentions_segments() {
        assert!(ConfigError::ZeroSegments.to_string().contains("segment"));
    }

    #[test]
    fn empty_queue_display() {
        assert_eq!(EmptyQueueError.to_string(), "no items are in the queue");
    }

    #[test]
    fn empty_queue_debug() {
        let dbg = format!("{:?}", EmptyQueueError);
        assert_eq!(dbg, "EmptyQueueError");
    }

    #[cfg(feature = "std")]
    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
        assert_error::<EmptyQueueError>();
    }
}
