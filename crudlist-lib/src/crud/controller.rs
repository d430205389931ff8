//! Loader and view wired together

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::watch;

use super::RemoveFn;
use crate::error::Error;
use crate::loader::DataLoader;
use crate::loader::LoaderState;
use crate::loader::Params;
use crate::loader::Scope;
use crate::model::Row;
use crate::view::ListView;

/// Observes whether a list is busy, from outside the controller.
#[derive(Debug, Clone)]
pub struct BusyHandle {
    loader: watch::Receiver<LoaderState>,
    deleting: Arc<AtomicBool>,
}

impl BusyHandle {
    /// Returns `true` while loading or deleting.
    pub fn is_busy(&self) -> bool {
        self.loader.borrow().loading || self.deleting.load(Ordering::SeqCst)
    }
}

/// A list backed by a data loader.
///
/// Loaded data is pushed into the view after every load. Deleting goes
/// through the view's delete flow and then reloads, bypassing memoized
/// results.
///
/// # Example
///
/// ```ignore
/// let loader = DataLoader::new(ContextLoader::new("servers", fetcher), LoaderOptions::new());
/// let view = ListView::new(columns, filters, ListOptions::new())?;
/// let mut list = ListController::new(loader, view).with_remover(Arc::new(ServerRemover::new(client)));
///
/// list.activate().await;
/// list.view_mut().toggle_row(&list.view().visible_rows()[0]);
/// list.delete_selected().await?;
/// ```
pub struct ListController {
    loader: DataLoader,
    view: ListView,
    remover: Option<Arc<dyn RemoveFn>>,
    deleting: Arc<AtomicBool>,
}

impl ListController {
    pub fn new(loader: DataLoader, view: ListView) -> Self {
        Self {
            loader,
            view,
            remover: None,
            deleting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enables deletion through the given remove operation.
    pub fn with_remover(mut self, remover: Arc<dyn RemoveFn>) -> Self {
        self.remover = Some(remover);
        self
    }

    /// Runs the first load.
    pub async fn activate(&mut self) {
        self.loader.activate().await;
        self.sync();
    }

    /// Reloads the data.
    pub async fn reload(&mut self, refetch: bool) {
        self.loader.reload(refetch).await;
        self.sync();
    }

    /// Changes the loader params, reloading if they differ.
    pub async fn set_params(&mut self, params: Params) {
        if let Some(load) = self.loader.set_params(params) {
            load.await;
            self.sync();
        }
    }

    /// Changes the loader scope, reloading if it differs.
    pub async fn set_scope(&mut self, scope: Scope) {
        if let Some(load) = self.loader.set_scope(scope) {
            load.await;
            self.sync();
        }
    }

    /// Pushes the loader's latest data into the view.
    ///
    /// Returns `false` if the view already shows it.
    pub fn sync(&mut self) -> bool {
        let data = self.loader.data();
        if same_rows(&data, self.view.data()) {
            return false;
        }
        self.view.set_data(data);
        true
    }

    /// Returns `true` while loading or deleting.
    pub fn busy(&self) -> bool {
        self.loader.loading() || self.deleting.load(Ordering::SeqCst)
    }

    pub fn busy_handle(&self) -> BusyHandle {
        BusyHandle {
            loader: self.loader.subscribe(),
            deleting: Arc::clone(&self.deleting),
        }
    }

    /// Deletes the selected rows, then reloads.
    ///
    /// Does nothing without a remove operation. The reload happens whether or
    /// not every removal succeeded. Rows that could not be removed stay
    /// selected after the reload, matched by unique identifier, as long as
    /// they are still part of the data.
    pub async fn delete_selected(&mut self) -> Result<usize, Error> {
        let Some(remover) = self.remover.clone() else {
            log::debug!("{}: no remove operation, ignoring delete", self.loader.key());
            return Ok(0);
        };
        if self.view.selected().is_empty() {
            return Ok(0);
        }

        self.deleting.store(true, Ordering::SeqCst);
        let result = self.view.delete_selected(remover.as_ref()).await;
        self.deleting.store(false, Ordering::SeqCst);

        // Identifiers of the failed rows resolved once already during the delete
        let failed = match &result {
            Err(Error::Delete(_)) => self.view.selected_ids().unwrap_or_default(),
            _ => Vec::new(),
        };

        self.reload(true).await;
        self.view.select_ids(&failed);
        result
    }

    /// Unique identifier of the row to edit.
    pub fn edit_selected(&self) -> Result<Option<String>, Error> {
        Ok(self.view.edit_selected()?)
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView {
        &mut self.view
    }
}

fn same_rows(a: &[Row], b: &[Row]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ptr_eq(y))
}
