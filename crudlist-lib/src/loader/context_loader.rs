//! Caching loader function over a fetcher

use std::sync::Arc;

use async_trait::async_trait;

use super::LoaderContext;
use super::LoaderFn;
use crate::cache::CacheConfig;
use crate::cache::CacheProvider;
use crate::cache::CachedRows;
use crate::cache::InMemoryCache;
use crate::error::LoadError;
use crate::model::Row;

/// Fetches a collection from its source.
///
/// Unlike a [`LoaderFn`], a fetcher may fail; [`ContextLoader`] turns failures
/// into reports and fallback data.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the collection for the given context.
    async fn fetch(&self, ctx: &LoaderContext) -> Result<Vec<Row>, LoadError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, ctx: &LoaderContext) -> Result<Vec<Row>, LoadError> {
        (**self).fetch(ctx).await
    }
}

/// Standard loader function for an entity.
///
/// - Results are memoized per scope and params for the configured TTL; a
///   request with `refetch` set skips the cache and refreshes it.
/// - Every loaded collection is also stored in the [`AppContext`](super::AppContext)
///   under the loader key.
/// - On a fetch failure the error goes to the request's error handler and the
///   last collection stored in the app context is returned (empty if none), so
///   previously loaded data stays available.
///
/// # Example
///
/// ```ignore
/// let loader = ContextLoader::new("flavors", FlavorsFetcher::new(client))
///     .with_config(CacheConfig::default().with_ttl(Duration::from_secs(60)))
///     .with_error_message("Unable to load flavors");
/// let data_loader = DataLoader::new(loader, LoaderOptions::new());
/// ```
pub struct ContextLoader<F> {
    key: String,
    fetcher: F,
    cache: Arc<dyn CacheProvider>,
    config: CacheConfig,
    error_message: String,
}

impl<F: Fetcher> ContextLoader<F> {
    /// Creates a loader for the entity `key` backed by an in-memory cache.
    pub fn new(key: impl Into<String>, fetcher: F) -> Self {
        let key = key.into();
        Self {
            error_message: format!("Unable to load {key}"),
            key,
            fetcher,
            cache: Arc::new(InMemoryCache::new()),
            config: CacheConfig::default(),
        }
    }

    /// Uses the given cache provider.
    pub fn with_cache(mut self, cache: Arc<dyn CacheProvider>) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the cache configuration.
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the message shown when a fetch fails.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    fn cache_prefix(&self) -> String {
        format!("{}:", self.key)
    }

    fn cache_key(&self, ctx: &LoaderContext) -> String {
        format!(
            "{}{}:{}",
            self.cache_prefix(),
            ctx.scope.cache_key(),
            ctx.params.cache_key()
        )
    }
}

#[async_trait]
impl<F: Fetcher> LoaderFn for ContextLoader<F> {
    fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self, ctx: LoaderContext) -> Vec<Row> {
        let cache_key = self.cache_key(&ctx);

        if self.config.is_enabled()
            && !ctx.refetch
            && let Some(hit) = self.cache.get(&cache_key).await
        {
            log::debug!("{}: cache hit for {cache_key}", self.key);
            ctx.app.set_context(&self.key, hit.rows.clone());
            return hit.rows;
        }

        match self.fetcher.fetch(&ctx).await {
            Ok(rows) => {
                if self.config.is_enabled() {
                    let evicted = self.cache.gc().await;
                    if evicted > 0 {
                        log::debug!("{}: evicted {evicted} expired cache entries", self.key);
                    }
                    self.cache
                        .set(&cache_key, CachedRows::with_ttl(rows.clone(), self.config.ttl))
                        .await;
                }
                ctx.app.set_context(&self.key, rows.clone());
                rows
            }
            Err(err) => {
                ctx.on_error.report(&self.error_message, &err, &ctx.params);
                ctx.app.get_context(&self.key).unwrap_or_default()
            }
        }
    }

    async fn invalidate_cache(&self) {
        log::debug!("{}: invalidating cache", self.key);
        self.cache.remove_prefix(&self.cache_prefix()).await;
    }
}
