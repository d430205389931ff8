//! Loader result caching
//!
//! Provides a `CacheProvider` trait and an in-memory implementation for
//! caching loaded collections per request key with TTL support. Used by
//! [`ContextLoader`](crate::loader::ContextLoader) to memoize fetches.

mod config;
mod memory;

pub use config::*;
pub use memory::*;

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::model::Row;

/// A cached collection with metadata about when it was cached and when it expires.
///
/// Rows are kept as shared handles, so a cache hit hands out the very same
/// rows as the fetch that filled it and row identity survives memoized reloads.
#[derive(Debug, Clone)]
pub struct CachedRows {
    /// The cached rows.
    pub rows: Vec<Row>,
    /// When these rows were cached.
    pub created_at: DateTime<Utc>,
    /// When these rows expire and should no longer be returned.
    pub expires_at: DateTime<Utc>,
}

impl CachedRows {
    /// Creates a cached entry with a TTL from now.
    pub fn with_ttl(rows: Vec<Row>, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            rows,
            created_at: now,
            expires_at,
        }
    }

    /// Returns `true` if this entry has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Trait for cache providers.
///
/// Implementations store and retrieve cached collections by string keys.
/// The provider is responsible for:
/// - Never returning expired entries from `get()`
/// - Providing garbage collection for expired entries
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Retrieves cached rows by key.
    ///
    /// Returns `None` if the key doesn't exist or the entry has expired.
    async fn get(&self, key: &str) -> Option<CachedRows>;

    /// Stores rows in the cache.
    async fn set(&self, key: &str, value: CachedRows);

    /// Removes every entry whose key starts with `prefix`.
    async fn remove_prefix(&self, prefix: &str);

    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    async fn gc(&self) -> usize;
}
