//! Configuration for the Least Recently Used (LRU) cache.
//!
//! An LRU cache has a single sizing parameter: the maximum number of entries.
//! It is a [`NonZeroUsize`], so a cache that can hold nothing cannot be
//! configured. Use [`LruCacheConfig::try_new`] when the capacity comes from
//! user input and may be zero.
//!
//! # Examples
//!
//! ```
//! use algokit::config::LruCacheConfig;
//! use algokit::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(10_000).unwrap(),
//! };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 10_000);
//!
//! // Capacity read from a flag or a file
//! assert!(LruCacheConfig::try_new(0).is_err());
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// LRU evicts the least recently accessed entry when an insertion would push
/// the entry count past `capacity`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Creates a configuration with the given capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// Creates a configuration from a plain integer, rejecting zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { capacity })
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_creation() {
        let config = LruCacheConfig {
            capacity: NonZeroUsize::new(1000).unwrap(),
        };
        assert_eq!(config.capacity.get(), 1000);
        assert_eq!(config, LruCacheConfig::new(NonZeroUsize::new(1000).unwrap()));
    }

    #[test]
    fn test_lru_config_try_new() {
        assert_eq!(LruCacheConfig::try_new(10).unwrap().capacity().get(), 10);
        assert_eq!(LruCacheConfig::try_new(0), Err(ConfigError::ZeroCapacity));
    }
}
