//! List options

use std::fmt;
use std::sync::Arc;

use super::Direction;
use super::page::DEFAULT_ROWS_PER_PAGE;
use super::page::DEFAULT_ROWS_PER_PAGE_OPTIONS;
use crate::model::UniqueIdentifier;

/// Called with `(order_by, direction)` after the sort changes.
pub type SortChangeFn = Arc<dyn Fn(&str, Direction) + Send + Sync>;

/// Called with the new rows per page.
pub type RowsPerPageChangeFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Called with `(visible_columns, columns_order)` after a column change.
pub type ColumnsChangeFn = Arc<dyn Fn(&[String], &[String]) + Send + Sync>;

/// Behavior of a list.
///
/// # Example
///
/// ```
/// use crudlist_lib::model::UniqueIdentifier;
/// use crudlist_lib::view::ListOptions;
///
/// let options = ListOptions::new()
///     .with_search_target("name")
///     .with_rows_per_page(25)
///     .with_unique_identifier(UniqueIdentifier::field("name"));
/// ```
#[derive(Clone)]
pub struct ListOptions {
    /// Field matched by the search term. Search is off when unset.
    pub search_target: Option<String>,
    /// Split rows into pages.
    pub paginate: bool,
    /// Initial rows per page.
    pub rows_per_page: usize,
    /// Rows-per-page choices.
    pub rows_per_page_options: Vec<usize>,
    /// Rows can be selected.
    pub show_checkboxes: bool,
    /// Column visibility can be changed.
    pub can_edit_columns: bool,
    /// How a row's identifier is resolved.
    pub unique_identifier: UniqueIdentifier,
    /// Text shown when there is nothing to list.
    pub empty_text: String,
    /// Server-side sorting. When set, rows are not sorted locally.
    pub on_sort_change: Option<SortChangeFn>,
    pub on_rows_per_page_change: Option<RowsPerPageChangeFn>,
    pub on_columns_change: Option<ColumnsChangeFn>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            search_target: None,
            paginate: true,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            show_checkboxes: true,
            can_edit_columns: true,
            unique_identifier: UniqueIdentifier::default(),
            empty_text: "No data found".to_string(),
            on_sort_change: None,
            on_rows_per_page_change: None,
            on_columns_change: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_target(mut self, field: impl Into<String>) -> Self {
        self.search_target = Some(field.into());
        self
    }

    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    pub fn with_rows_per_page_options(mut self, options: Vec<usize>) -> Self {
        self.rows_per_page_options = options;
        self
    }

    pub fn with_checkboxes(mut self, show: bool) -> Self {
        self.show_checkboxes = show;
        self
    }

    pub fn with_column_editing(mut self, enabled: bool) -> Self {
        self.can_edit_columns = enabled;
        self
    }

    pub fn with_unique_identifier(mut self, identifier: UniqueIdentifier) -> Self {
        self.unique_identifier = identifier;
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    /// Hands sorting to an external handler.
    pub fn on_sort_change(mut self, f: impl Fn(&str, Direction) + Send + Sync + 'static) -> Self {
        self.on_sort_change = Some(Arc::new(f));
        self
    }

    pub fn on_rows_per_page_change(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_rows_per_page_change = Some(Arc::new(f));
        self
    }

    pub fn on_columns_change(mut self, f: impl Fn(&[String], &[String]) + Send + Sync + 'static) -> Self {
        self.on_columns_change = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("search_target", &self.search_target)
            .field("paginate", &self.paginate)
            .field("rows_per_page", &self.rows_per_page)
            .field("rows_per_page_options", &self.rows_per_page_options)
            .field("show_checkboxes", &self.show_checkboxes)
            .field("can_edit_columns", &self.can_edit_columns)
            .field("unique_identifier", &self.unique_identifier)
            .field("external_sort", &self.on_sort_change.is_some())
            .finish_non_exhaustive()
    }
}
