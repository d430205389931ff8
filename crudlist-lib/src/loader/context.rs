//! Context handed to loader functions

use std::sync::Arc;

use dashmap::DashMap;

use super::Params;
use super::Scope;
use crate::model::Row;
use crate::notify::Notifier;
use crate::notify::Toast;

/// Application-wide store of the last loaded collection per entity key.
///
/// Loader functions write what they load here so other loaders can build on
/// it, and fall back to it when a fetch fails. Cheap to clone; clones share
/// the same store.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    store: Arc<DashMap<String, Vec<Row>>>,
}

impl AppContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rows stored under `key`.
    pub fn get_context(&self, key: &str) -> Option<Vec<Row>> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    /// Stores rows under `key`, replacing what was there.
    pub fn set_context(&self, key: impl Into<String>, rows: Vec<Row>) {
        self.store.insert(key.into(), rows);
    }
}

/// Reports fetch failures of one loader.
///
/// Built once per [`DataLoader`](super::DataLoader) and handed to every
/// request. Logs the failure with the loader key and shows the message as an
/// error toast.
#[derive(Clone)]
pub struct ErrorHandler {
    key: String,
    notifier: Arc<dyn Notifier>,
}

impl ErrorHandler {
    /// Creates a handler for the loader identified by `key`.
    pub fn new(key: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            key: key.into(),
            notifier,
        }
    }

    /// Reports a failure.
    pub fn report(&self, message: &str, error: &dyn std::error::Error, params: &Params) {
        log::error!(
            "Error when fetching items for entity \"{}\" with params {}: {}",
            self.key,
            params.cache_key(),
            error
        );
        self.notifier.notify(Toast::error(message));
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler").field("key", &self.key).finish()
    }
}

/// Everything a loader function gets for one request.
#[derive(Debug, Clone)]
pub struct LoaderContext {
    /// Shared application context.
    pub app: AppContext,
    /// Failure reporting for this loader.
    pub on_error: ErrorHandler,
    /// Request parameters.
    pub params: Params,
    /// Current tenant/region.
    pub scope: Scope,
    /// Bypass memoized results.
    pub refetch: bool,
}
