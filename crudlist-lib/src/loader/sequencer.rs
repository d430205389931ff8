//! FIFO-sequenced data loader

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::Weak;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;
use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::AppContext;
use super::ErrorHandler;
use super::LoaderContext;
use super::LoaderFn;
use super::Params;
use super::Scope;
use crate::model::Row;
use crate::notify::LogNotifier;
use crate::notify::Notifier;

/// Future returned by every load trigger of a [`DataLoader`].
///
/// The request is queued and, inside a Tokio runtime, started when the
/// trigger is called; the future resolves once its result has been applied
/// or discarded. Dropping it does not cancel the request. Outside a runtime
/// nothing runs until the future is driven.
pub type LoadFuture = BoxFuture<'static, ()>;

type PendingRequest = Shared<BoxFuture<'static, Vec<Row>>>;

/// The published result of a data loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderState {
    /// The latest applied collection.
    pub data: Vec<Row>,
    /// Whether a request is in flight.
    pub loading: bool,
}

/// Options for constructing a [`DataLoader`].
///
/// # Example
///
/// ```
/// use crudlist_lib::loader::{LoaderOptions, Params, Scope};
///
/// let options = LoaderOptions::new()
///     .with_params(Params::new().with("clusterId", "c1"))
///     .with_scope(Scope::new().with_tenant("service"))
///     .invalidate_cache(true);
/// ```
#[derive(Clone)]
pub struct LoaderOptions {
    /// Initial params.
    pub params: Params,
    /// Initial scope.
    pub scope: Scope,
    /// Drop the loader's cache before the first request.
    pub invalidate_cache: bool,
    /// Shared application context.
    pub app: AppContext,
    /// Where fetch failures are shown.
    pub notifier: Arc<dyn Notifier>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            params: Params::default(),
            scope: Scope::default(),
            invalidate_cache: false,
            app: AppContext::default(),
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl LoaderOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial params.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the initial scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Invalidates the loader's cache before the first request.
    pub fn invalidate_cache(mut self, invalidate: bool) -> Self {
        self.invalidate_cache = invalidate;
        self
    }

    /// Sets the shared application context.
    pub fn with_app(mut self, app: AppContext) -> Self {
        self.app = app;
        self
    }

    /// Sets the notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

struct LoaderInner {
    loader: Arc<dyn LoaderFn>,
    app: AppContext,
    on_error: ErrorHandler,
    request: Mutex<(Params, Scope)>,
    queue: Mutex<VecDeque<PendingRequest>>,
    issued: AtomicU64,
    invalidate_cache: AtomicBool,
    alive: AtomicBool,
    state: watch::Sender<LoaderState>,
}

impl LoaderInner {
    fn queue(&self) -> MutexGuard<'_, VecDeque<PendingRequest>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn request(&self) -> MutexGuard<'_, (Params, Scope)> {
        self.request.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, seq: u64, rows: Vec<Row>) {
        if !self.alive.load(Ordering::SeqCst) {
            log::debug!("{}: discarding request #{seq}, loader torn down", self.loader.key());
            return;
        }
        if !self.queue().is_empty() || self.issued.load(Ordering::SeqCst) != seq {
            log::debug!("{}: request #{seq} superseded", self.loader.key());
            return;
        }
        log::debug!("{}: applying request #{seq} ({} rows)", self.loader.key(), rows.len());
        self.state.send_modify(|state| {
            state.loading = false;
            state.data = rows;
        });
    }
}

/// Loads a collection and keeps it current.
///
/// Every trigger ([`activate`](Self::activate), [`reload`](Self::reload), a
/// params or scope change) queues a request and starts it on the current
/// runtime. A request first waits for all
/// requests queued before it, then calls the loader function, then leaves the
/// queue. Only the last issued request publishes its result, so the state
/// never regresses to an older response, whatever order the underlying
/// fetches finish in.
///
/// Dropping the loader (or calling [`teardown`](Self::teardown)) fences
/// in-flight requests: they run to completion but their results are
/// discarded.
///
/// # Example
///
/// ```ignore
/// let loader = DataLoader::new(flavors_loader, LoaderOptions::new());
/// loader.activate().await;
///
/// let mut rx = loader.subscribe();
/// loader.set_params(Params::new().with("public", true));
/// rx.changed().await?;
/// println!("{} rows", rx.borrow().data.len());
/// ```
pub struct DataLoader {
    inner: Arc<LoaderInner>,
}

impl DataLoader {
    /// Creates a loader. No request is issued until [`activate`](Self::activate).
    pub fn new(loader: impl LoaderFn + 'static, options: LoaderOptions) -> Self {
        Self::from_arc(Arc::new(loader), options)
    }

    /// Creates a loader from a shared loader function.
    pub fn from_arc(loader: Arc<dyn LoaderFn>, options: LoaderOptions) -> Self {
        let on_error = ErrorHandler::new(loader.key(), options.notifier);
        let (state, _) = watch::channel(LoaderState::default());
        Self {
            inner: Arc::new(LoaderInner {
                loader,
                app: options.app,
                on_error,
                request: Mutex::new((options.params, options.scope)),
                queue: Mutex::new(VecDeque::new()),
                issued: AtomicU64::new(0),
                invalidate_cache: AtomicBool::new(options.invalidate_cache),
                alive: AtomicBool::new(true),
                state,
            }),
        }
    }

    /// Issues the initial request.
    pub fn activate(&self) -> LoadFuture {
        self.issue(false)
    }

    /// Issues a request with the current params.
    ///
    /// `refetch` asks the loader function to bypass memoized results.
    pub fn reload(&self, refetch: bool) -> LoadFuture {
        self.issue(refetch)
    }

    /// Replaces the params, issuing a request if they differ deeply from the
    /// current ones.
    pub fn set_params(&self, params: Params) -> Option<LoadFuture> {
        {
            let mut request = self.inner.request();
            if request.0 == params {
                return None;
            }
            request.0 = params;
        }
        Some(self.issue(false))
    }

    /// Replaces the scope, issuing a request if it changed.
    pub fn set_scope(&self, scope: Scope) -> Option<LoadFuture> {
        {
            let mut request = self.inner.request();
            if request.1 == scope {
                return None;
            }
            request.1 = scope;
        }
        Some(self.issue(false))
    }

    /// Returns the current params.
    pub fn params(&self) -> Params {
        self.inner.request().0.clone()
    }

    /// Returns the current scope.
    pub fn scope(&self) -> Scope {
        self.inner.request().1.clone()
    }

    /// Returns the latest applied collection.
    pub fn data(&self) -> Vec<Row> {
        self.inner.state.borrow().data.clone()
    }

    /// Returns `true` while requests are in flight.
    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Returns a snapshot of the published state.
    pub fn state(&self) -> LoaderState {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.inner.state.subscribe()
    }

    /// Number of queued requests that have not finished.
    pub fn pending(&self) -> usize {
        self.inner.queue().len()
    }

    /// Key of the loader function.
    pub fn key(&self) -> &str {
        self.inner.loader.key()
    }

    /// Fences all in-flight requests. Their results will be discarded.
    pub fn teardown(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    /// Returns `false` once the loader has been torn down.
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }

    fn issue(&self, refetch: bool) -> LoadFuture {
        let inner = &self.inner;
        let ctx = {
            let request = inner.request();
            LoaderContext {
                app: inner.app.clone(),
                on_error: inner.on_error.clone(),
                params: request.0.clone(),
                scope: request.1.clone(),
                refetch,
            }
        };
        let invalidate = inner.invalidate_cache.swap(false, Ordering::SeqCst);

        let mut queue = inner.queue();
        if queue.is_empty() {
            inner.state.send_modify(|state| state.loading = true);
        }
        let previous: Vec<PendingRequest> = queue.iter().cloned().collect();
        let seq = inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!(
            "{}: issuing request #{seq} behind {} pending (refetch: {refetch})",
            inner.loader.key(),
            previous.len()
        );

        let loader = Arc::clone(&inner.loader);
        let owner: Weak<LoaderInner> = Arc::downgrade(inner);
        let request = async move {
            join_all(previous).await;
            if invalidate {
                loader.invalidate_cache().await;
            }
            let rows = loader.load(ctx).await;
            if let Some(owner) = owner.upgrade() {
                owner.queue().pop_front();
            }
            rows
        }
        .boxed()
        .shared();
        queue.push_back(request.clone());
        drop(queue);

        let inner = Arc::clone(inner);
        let applied = async move {
            let rows = request.await;
            inner.apply(seq, rows);
        }
        .boxed()
        .shared();
        if let Ok(runtime) = Handle::try_current() {
            runtime.spawn(applied.clone());
        }
        applied.boxed()
    }
}

impl Drop for DataLoader {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("key", &self.key())
            .field("pending", &self.pending())
            .field("alive", &self.is_alive())
            .finish()
    }
}
