//! List view engine

use std::collections::HashMap;

use futures::future::join_all;
use tokio::sync::watch;

use super::Column;
use super::FilterSpec;
use super::Filters;
use super::ListOptions;
use super::ListPrefs;
use super::PageInfo;
use super::ViewEvent;
use super::ViewState;
use super::page::page_after_delete;
use super::page::paginate;
use super::reduce;
use super::search::search_rows;
use super::sort::sort_rows;
use crate::crud::RemoveFn;
use crate::crud::confirm_text;
use crate::error::ConfigError;
use crate::error::DeleteFailure;
use crate::error::Error;
use crate::model::Row;
use crate::model::Value;

/// What a list renders.
#[derive(Debug, Clone)]
pub struct ListOutput {
    /// Visible columns, in display order.
    pub columns: Vec<Column>,
    /// Rows of the current page.
    pub rows: Vec<Row>,
    /// Pager info, `None` when pagination is off.
    pub page: Option<PageInfo>,
    pub num_selected: usize,
    /// Every row of the current page is selected.
    pub all_selected: bool,
    /// Set when there are no rows to show.
    pub empty_text: Option<String>,
}

impl ListOutput {
    /// Header labels.
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.label.as_str()).collect()
    }

    /// Rendered cells, one `Vec` per row.
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|column| column.render_cell(row)).collect())
            .collect()
    }
}

/// Derives what a list shows from its data and interaction state.
///
/// Rows go through sort, search and filters, then pagination. Every
/// interaction is a [`ViewEvent`] applied with [`reduce`]; the resulting
/// state is published to [`subscribe`](Self::subscribe)rs.
///
/// # Example
///
/// ```
/// use crudlist_lib::model::{Record, Row};
/// use crudlist_lib::view::{Column, ListOptions, ListView};
///
/// let mut view = ListView::new(
///     vec![Column::new("name", "Name"), Column::new("ram", "RAM")],
///     vec![],
///     ListOptions::new().with_search_target("name"),
/// )?;
/// view.set_data(vec![
///     Row::new(Record::new().set("name", "m1.small").set("ram", 2048)),
///     Row::new(Record::new().set("name", "m1.large").set("ram", 8192)),
/// ]);
/// view.search("large");
/// assert_eq!(view.visible_rows().len(), 1);
/// # Ok::<(), crudlist_lib::error::ConfigError>(())
/// ```
pub struct ListView {
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    filters: Filters,
    options: ListOptions,
    data: Vec<Row>,
    state: ViewState,
    tx: watch::Sender<ViewState>,
}

impl ListView {
    /// Creates a list with default preferences.
    pub fn new(columns: Vec<Column>, filters: Vec<FilterSpec>, options: ListOptions) -> Result<Self, ConfigError> {
        Self::with_prefs(columns, filters, options, &ListPrefs::default())
    }

    /// Creates a list seeded with saved preferences.
    pub fn with_prefs(
        columns: Vec<Column>,
        filters: Vec<FilterSpec>,
        options: ListOptions,
        prefs: &ListPrefs,
    ) -> Result<Self, ConfigError> {
        if options.rows_per_page_options.contains(&0) {
            return Err(ConfigError::InvalidRowsPerPage);
        }
        let state = ViewState::initial(&columns, &options, prefs)?;
        let filters = Filters::new(filters)?;
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.id.clone(), i))
            .collect();
        let (tx, _) = watch::channel(state.clone());

        Ok(Self {
            columns,
            column_index,
            filters,
            options,
            data: Vec::new(),
            state,
            tx,
        })
    }

    // Data

    /// Replaces the data, dropping selected rows that are gone.
    pub fn set_data(&mut self, data: Vec<Row>) {
        self.data = data;
        self.dispatch(ViewEvent::PruneSelection(self.data.clone()));
    }

    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Rows after sort, search and filters, before pagination.
    pub fn filtered_rows(&self) -> Vec<Row> {
        let state = &self.state;
        let rows = match self.column(&state.order_by) {
            Some(column) if self.options.on_sort_change.is_none() => {
                sort_rows(&self.data, column, state.order_direction)
            }
            _ => self.data.clone(),
        };
        let rows = match &self.options.search_target {
            Some(target) => search_rows(rows, target, &state.search_term),
            None => rows,
        };
        self.filters.apply(rows, &state.filter_values)
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.page_of(self.filtered_rows())
    }

    /// Pager info for the current rows.
    pub fn page_info(&self) -> PageInfo {
        self.page_info_for(self.filtered_rows().len())
    }

    /// Everything needed to render the list.
    pub fn output(&self) -> ListOutput {
        let filtered = self.filtered_rows();
        let page = self.options.paginate.then(|| self.page_info_for(filtered.len()));
        let rows = self.page_of(filtered);
        ListOutput {
            columns: self.sorted_visible_columns().into_iter().cloned().collect(),
            all_selected: !rows.is_empty() && self.state.selected.are_all_selected(&rows),
            num_selected: self.state.selected.len(),
            empty_text: rows.is_empty().then(|| self.options.empty_text.clone()),
            page,
            rows,
        }
    }

    // Columns

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.column_index.get(column_id).map(|&i| &self.columns[i])
    }

    /// Visible columns, in display order.
    pub fn sorted_visible_columns(&self) -> Vec<&Column> {
        self.ordered_columns()
            .filter(|column| !column.excluded && self.state.is_visible(&column.id))
            .collect()
    }

    /// Columns offered by the column picker, with their visibility.
    pub fn picker_columns(&self) -> Vec<(&Column, bool)> {
        self.ordered_columns()
            .filter(|column| !column.excluded)
            .map(|column| (column, self.state.is_visible(&column.id)))
            .collect()
    }

    /// Shows or hides a column. Does nothing unless column editing is enabled.
    pub fn toggle_column(&mut self, column_id: &str) -> Result<(), ConfigError> {
        self.require_column(column_id)?;
        if !self.options.can_edit_columns {
            return Ok(());
        }
        self.dispatch(ViewEvent::ToggleColumn(column_id.to_string()));
        self.columns_changed();
        Ok(())
    }

    /// Swaps the positions of two columns.
    pub fn switch_columns(&mut self, src: &str, dest: &str) -> Result<(), ConfigError> {
        self.require_column(src)?;
        self.require_column(dest)?;
        self.dispatch(ViewEvent::SwitchColumns {
            src: src.to_string(),
            dest: dest.to_string(),
        });
        self.columns_changed();
        Ok(())
    }

    // Sorting and paging

    /// Sorts by a column: descending first, then toggling.
    pub fn request_sort(&mut self, column_id: &str) -> Result<(), ConfigError> {
        self.require_column(column_id)?;
        self.dispatch(ViewEvent::RequestSort(column_id.to_string()));
        if let Some(on_sort_change) = &self.options.on_sort_change {
            on_sort_change(&self.state.order_by, self.state.order_direction);
        }
        Ok(())
    }

    pub fn change_page(&mut self, page: usize) {
        self.dispatch(ViewEvent::ChangePage(page));
    }

    /// Changes the page size. The page index is kept.
    pub fn change_rows_per_page(&mut self, rows_per_page: usize) -> Result<(), ConfigError> {
        if rows_per_page == 0 {
            return Err(ConfigError::InvalidRowsPerPage);
        }
        self.dispatch(ViewEvent::ChangeRowsPerPage(rows_per_page));
        if let Some(on_change) = &self.options.on_rows_per_page_change {
            on_change(rows_per_page);
        }
        Ok(())
    }

    // Search and filters

    /// Sets the search term. Ignored when no search target is configured.
    pub fn search(&mut self, term: impl Into<String>) {
        if self.options.search_target.is_none() {
            log::debug!("ignoring search, no search target");
            return;
        }
        self.dispatch(ViewEvent::Search(term.into()));
    }

    /// Sets the value of a filter.
    pub fn update_filter(&mut self, column_id: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.require_filter(column_id)?;
        let value = value.into();
        self.dispatch(ViewEvent::UpdateFilter {
            column_id: column_id.to_string(),
            value: value.clone(),
        });
        self.filter_changed(column_id, &value);
        Ok(())
    }

    /// Unsets a filter.
    pub fn clear_filter(&mut self, column_id: &str) -> Result<(), ConfigError> {
        self.require_filter(column_id)?;
        self.dispatch(ViewEvent::ClearFilter(column_id.to_string()));
        self.filter_changed(column_id, &Value::Null);
        Ok(())
    }

    /// Unsets every filter.
    pub fn reset_filters(&mut self) {
        let cleared: Vec<String> = self.state.filter_values.keys().cloned().collect();
        self.dispatch(ViewEvent::ResetFilters);
        for column_id in cleared {
            self.filter_changed(&column_id, &Value::Null);
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    // Selection

    /// Toggles a row. Returns `true` if it is now selected.
    pub fn toggle_row(&mut self, row: &Row) -> bool {
        if !self.options.show_checkboxes {
            return false;
        }
        self.dispatch(ViewEvent::ToggleRow(row.clone()));
        self.state.selected.is_selected(row)
    }

    /// Selects or deselects exactly the rows of the current page.
    pub fn select_all_visible(&mut self, checked: bool) {
        if !self.options.show_checkboxes {
            return;
        }
        let rows = self.visible_rows();
        self.dispatch(ViewEvent::SelectRows { rows, checked });
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.state.selected.is_selected(row)
    }

    /// Returns `true` if every given row is selected.
    pub fn are_all_selected(&self, rows: &[Row]) -> bool {
        self.state.selected.are_all_selected(rows)
    }

    /// Selected rows, in selection order.
    pub fn selected(&self) -> &[Row] {
        self.state.selected.rows()
    }

    /// Unique identifiers of the selected rows.
    pub fn selected_ids(&self) -> Result<Vec<String>, ConfigError> {
        self.selected()
            .iter()
            .map(|row| self.options.unique_identifier.resolve(row))
            .collect()
    }

    /// Selects the rows of the current data whose unique identifier is in `ids`.
    pub fn select_ids(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        let rows: Vec<Row> = self
            .data
            .iter()
            .filter(|row| {
                self.options
                    .unique_identifier
                    .resolve(row)
                    .is_ok_and(|id| ids.contains(&id))
            })
            .cloned()
            .collect();
        self.dispatch(ViewEvent::SelectRows { rows, checked: true });
    }

    /// Unique identifier of the row to edit, the first selected one.
    pub fn edit_selected(&self) -> Result<Option<String>, ConfigError> {
        self.state
            .selected
            .first()
            .map(|row| self.options.unique_identifier.resolve(row))
            .transpose()
    }

    /// Text asking to confirm deletion of the selected rows.
    pub fn delete_confirmation(&self) -> Option<String> {
        if self.state.selected.is_empty() {
            return None;
        }
        Some(confirm_text(self.selected()))
    }

    /// Removes the selected rows.
    ///
    /// Every row is removed concurrently by its unique identifier. Removed
    /// rows leave the selection. When all succeed the page steps back if it
    /// would now be empty, and the number of removed rows is returned.
    /// Otherwise the failed rows stay selected, the page is kept, and a
    /// [`DeleteFailure`] is returned.
    pub async fn delete_selected(&mut self, remover: &dyn RemoveFn) -> Result<usize, Error> {
        let selected = self.selected().to_vec();
        if selected.is_empty() {
            return Ok(0);
        }
        let ids = self.selected_ids()?;
        let count = self.filtered_rows().len();

        log::debug!("deleting {} rows", ids.len());
        let results = join_all(ids.iter().map(|id| remover.remove(id))).await;

        let mut removed = Vec::with_capacity(selected.len());
        let mut errors = Vec::new();
        for (row, result) in selected.into_iter().zip(results) {
            match result {
                Ok(()) => removed.push(row),
                Err(err) => {
                    log::warn!("{err}");
                    errors.push(err);
                }
            }
        }

        let deleted = removed.len();
        let page = if errors.is_empty() {
            page_after_delete(self.state.page, self.state.rows_per_page, count, deleted)
        } else {
            self.state.page
        };
        self.dispatch(ViewEvent::Deleted { rows: removed, page });

        if errors.is_empty() {
            Ok(deleted)
        } else {
            Err(DeleteFailure { errors, deleted }.into())
        }
    }

    // State

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Preferences to persist for the current state.
    pub fn prefs(&self) -> ListPrefs {
        ListPrefs::capture(&self.state)
    }

    fn dispatch(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
        self.tx.send_replace(self.state.clone());
    }

    fn ordered_columns(&self) -> impl Iterator<Item = &Column> {
        self.state.columns_order.iter().filter_map(|id| self.column(id))
    }

    fn page_of(&self, rows: Vec<Row>) -> Vec<Row> {
        if self.options.paginate {
            paginate(&rows, self.state.page, self.state.rows_per_page)
        } else {
            rows
        }
    }

    fn page_info_for(&self, count: usize) -> PageInfo {
        PageInfo {
            count,
            page: self.state.page,
            rows_per_page: self.state.rows_per_page,
            rows_per_page_options: self.options.rows_per_page_options.clone(),
        }
    }

    fn require_column(&self, column_id: &str) -> Result<(), ConfigError> {
        if self.column_index.contains_key(column_id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownColumn(column_id.to_string()))
        }
    }

    fn require_filter(&self, column_id: &str) -> Result<(), ConfigError> {
        match self.filters.get(column_id) {
            Some(_) => Ok(()),
            None => Err(ConfigError::UnknownFilter(column_id.to_string())),
        }
    }

    fn filter_changed(&self, column_id: &str, value: &Value) {
        if let Some(spec) = self.filters.get(column_id) {
            spec.changed(value);
        }
    }

    fn columns_changed(&self) {
        if let Some(on_change) = &self.options.on_columns_change {
            on_change(&self.state.visible_columns, &self.state.columns_order);
        }
    }
}

impl std::fmt::Debug for ListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("columns", &self.columns.len())
            .field("rows", &self.data.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
