//! Cache configuration

use std::time::Duration;

/// Configuration for loader result caching.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use crudlist_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_ttl(Duration::from_secs(60));
/// assert!(config.is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a loaded collection is served from cache.
    ///
    /// Default: 5 minutes
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self { ttl: Duration::ZERO }
    }

    /// Returns `true` if results are cached at all.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}
