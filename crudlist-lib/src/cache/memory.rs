//! In-memory cache implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedRows;

/// An in-memory cache backed by a concurrent hash map.
///
/// # Example
///
/// ```
/// use crudlist_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedRows>,
}

impl InMemoryCache {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedRows> {
        let entry = self.store.get(key)?;
        if entry.value().is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(entry.value().clone())
        }
    }

    async fn set(&self, key: &str, value: CachedRows) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove_prefix(&self, prefix: &str) {
        self.store.retain(|key, _| !key.starts_with(prefix));
    }

    async fn gc(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, value| !value.is_expired());
        before.saturating_sub(self.store.len())
    }
}
