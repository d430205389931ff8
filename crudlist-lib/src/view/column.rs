//! Column specs

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Compares two cell values, `prev` against `next`, in ascending order.
pub type SortFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Renders a cell value (with its row) to display text.
pub type RenderFn = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

pub(crate) static NULL: Value = Value::Null;

/// A column of a list.
///
/// - `display = false` hides the column from the grid but keeps it in the
///   column picker.
/// - `excluded` removes it from both.
///
/// # Example
///
/// ```
/// use crudlist_lib::view::Column;
///
/// let columns = vec![
///     Column::new("name", "Name"),
///     Column::new("ram", "RAM").with_render(|value, _| format!("{value} MB")),
///     Column::new("id", "ID").hidden(),
///     Column::new("tenant_id", "Tenant").excluded(),
/// ];
/// ```
#[derive(Clone)]
pub struct Column {
    /// Column id, also the field (or dotted path) the cell reads.
    pub id: String,
    /// Header label.
    pub label: String,
    /// Shown in the grid by default.
    pub display: bool,
    /// Hidden everywhere, including the column picker.
    pub excluded: bool,
    /// Extra properties passed through to the cell renderer.
    pub cell_props: BTreeMap<String, String>,
    render: Option<RenderFn>,
    sort_with: Option<SortFn>,
}

impl Column {
    /// Creates a displayed column.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            display: true,
            excluded: false,
            cell_props: BTreeMap::new(),
            render: None,
            sort_with: None,
        }
    }

    /// Hides the column from the grid, keeping it selectable.
    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }

    /// Excludes the column from the grid and the column picker.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Sets a custom cell renderer.
    pub fn with_render(mut self, render: impl Fn(&Value, &Row) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Sets a custom comparator.
    pub fn with_sort(mut self, sort_with: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort_with = Some(Arc::new(sort_with));
        self
    }

    /// Adds a cell property.
    pub fn with_cell_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cell_props.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the column starts out visible.
    pub fn is_displayed(&self) -> bool {
        self.display && !self.excluded
    }

    /// Returns the value of this column's cell in `row`.
    pub fn cell<'a>(&self, row: &'a Row) -> &'a Value {
        row.lookup(&self.id).unwrap_or(&NULL)
    }

    /// Compares two cell values with the column comparator, or the natural
    /// value ordering when none is set.
    pub fn compare(&self, prev: &Value, next: &Value) -> Ordering {
        match &self.sort_with {
            Some(sort_with) => sort_with(prev, next),
            None => prev.compare(next),
        }
    }

    /// Renders this column's cell in `row`.
    pub fn render_cell(&self, row: &Row) -> String {
        let value = self.cell(row);
        match &self.render {
            Some(render) => render(value, row),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("display", &self.display)
            .field("excluded", &self.excluded)
            .field("render", &self.render.is_some())
            .field("sort_with", &self.sort_with.is_some())
            .finish()
    }
}
