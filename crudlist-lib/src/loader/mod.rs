//! Sequenced data loading
//!
//! A [`DataLoader`] owns the load cycle of one list: it issues requests to a
//! [`LoaderFn`] whenever params or scope change, sequences them so results
//! land in issue order, and publishes the latest `(data, loading)` pair.
//!
//! [`ContextLoader`] is the standard loader function: it wraps a
//! [`Fetcher`] with a per-params result cache and stale fallback on errors.

mod context;
mod context_loader;
mod params;
mod sequencer;

pub use context::*;
pub use context_loader::*;
pub use params::*;
pub use sequencer::*;

use async_trait::async_trait;

use crate::model::Row;

/// An async function producing a collection.
///
/// Implementations catch their own fetch errors: they report them through
/// [`LoaderContext::on_error`] and still resolve, either with the previous
/// data or with an empty collection. A loader function that never resolves
/// stalls every request queued behind it.
#[async_trait]
pub trait LoaderFn: Send + Sync {
    /// Stable key identifying the loaded entity, used in diagnostics.
    fn key(&self) -> &str;

    /// Loads the collection for the given context.
    async fn load(&self, ctx: LoaderContext) -> Vec<Row>;

    /// Drops every memoized result of this loader.
    async fn invalidate_cache(&self) {}
}
