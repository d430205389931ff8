//! Filter specs and filtering

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::column::NULL;
use crate::error::ConfigError;
use crate::model::Row;
use crate::model::Value;

/// Predicate of a custom filter, called as `(filter_value, cell_value)`.
pub type FilterFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Change handler of a filter. A filter with a handler filters remotely.
pub type FilterChangeFn = Arc<dyn Fn(&Value) + Send + Sync>;

/// Kind of filter control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Single choice, cell must equal the filter value.
    Select,
    /// Several choices, cell must be one of them.
    MultiSelect,
    /// On/off, cell must equal the filter value.
    Checkbox,
    /// Arbitrary predicate.
    Custom,
}

/// A filter bound to a column.
#[derive(Clone)]
pub struct FilterSpec {
    /// Column the filter reads.
    pub column_id: String,
    /// Label of the filter control.
    pub label: Option<String>,
    /// Filter kind.
    pub kind: FilterKind,
    /// Choices offered by select controls.
    pub items: Vec<Value>,
    filter_with: Option<FilterFn>,
    on_change: Option<FilterChangeFn>,
}

impl FilterSpec {
    fn new(column_id: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            column_id: column_id.into(),
            label: None,
            kind,
            items: Vec::new(),
            filter_with: None,
            on_change: None,
        }
    }

    /// Single-choice filter.
    pub fn select(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterKind::Select)
    }

    /// Multi-choice filter.
    pub fn multiselect(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterKind::MultiSelect)
    }

    /// Checkbox filter.
    pub fn checkbox(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterKind::Checkbox)
    }

    /// Filter with a custom predicate.
    pub fn custom(
        column_id: impl Into<String>,
        filter_with: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(column_id, FilterKind::Custom).with_filter(filter_with)
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the choices.
    pub fn with_items<T: Into<Value>>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the predicate of any filter kind.
    pub fn with_filter(mut self, filter_with: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.filter_with = Some(Arc::new(filter_with));
        self
    }

    /// Delegates filtering to a change handler instead of filtering locally.
    pub fn with_on_change(mut self, on_change: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    /// Returns `true` if filtering happens outside the list.
    pub fn is_remote(&self) -> bool {
        self.on_change.is_some()
    }

    /// Notifies the change handler, if any.
    pub fn changed(&self, value: &Value) {
        if let Some(on_change) = &self.on_change {
            on_change(value);
        }
    }

    /// Returns `true` if a cell passes the filter.
    pub fn matches(&self, filter_value: &Value, cell: &Value) -> bool {
        if let Some(filter_with) = &self.filter_with {
            return filter_with(filter_value, cell);
        }
        match self.kind {
            FilterKind::MultiSelect => filter_value.contains(cell),
            FilterKind::Select | FilterKind::Checkbox | FilterKind::Custom => filter_value == cell,
        }
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("column_id", &self.column_id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("items", &self.items)
            .field("remote", &self.is_remote())
            .finish()
    }
}

/// Filter specs indexed by column.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    specs: Vec<FilterSpec>,
    index: HashMap<String, usize>,
}

impl Filters {
    /// Indexes filter specs, rejecting two filters on the same column.
    pub fn new(specs: Vec<FilterSpec>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if index.insert(spec.column_id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateColumn(spec.column_id.clone()));
            }
        }
        Ok(Self { specs, index })
    }

    /// Returns the filter on a column.
    pub fn get(&self, column_id: &str) -> Option<&FilterSpec> {
        self.index.get(column_id).map(|&i| &self.specs[i])
    }

    /// Iterates over the specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Keeps the rows passing every set filter.
    ///
    /// Remote filters and values without a spec impose no constraint.
    pub fn apply(&self, rows: Vec<Row>, values: &BTreeMap<String, Value>) -> Vec<Row> {
        let active: Vec<(&FilterSpec, &Value)> = values
            .iter()
            .filter_map(|(column_id, value)| self.get(column_id).map(|spec| (spec, value)))
            .filter(|(spec, _)| !spec.is_remote())
            .collect();
        if active.is_empty() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| {
                active
                    .iter()
                    .all(|(spec, value)| spec.matches(value, row.lookup(&spec.column_id).unwrap_or(&NULL)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn rows() -> Vec<Row> {
        vec![
            Row::new(Record::new().set("status", "active").set("type", "a")),
            Row::new(Record::new().set("status", "active").set("type", "c")),
            Row::new(Record::new().set("status", "error").set("type", "b")),
            Row::new(Record::new().set("status", "active").set("type", "b")),
        ]
    }

    #[test]
    fn test_filters_compose() {
        let filters = Filters::new(vec![FilterSpec::select("status"), FilterSpec::multiselect("type")]).unwrap();
        let mut values = BTreeMap::new();
        values.insert("status".to_string(), Value::from("active"));
        values.insert("type".to_string(), Value::from(vec!["a", "b"]));

        let filtered = filters.apply(rows(), &values);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.get_str("status") == Some("active")));
    }

    #[test]
    fn test_unset_filters_pass_through() {
        let filters = Filters::new(vec![FilterSpec::select("status")]).unwrap();
        assert_eq!(filters.apply(rows(), &BTreeMap::new()).len(), 4);
    }

    #[test]
    fn test_remote_filter_skipped() {
        let filters = Filters::new(vec![FilterSpec::select("status").with_on_change(|_| {})]).unwrap();
        let mut values = BTreeMap::new();
        values.insert("status".to_string(), Value::from("error"));
        assert_eq!(filters.apply(rows(), &values).len(), 4);
    }

    #[test]
    fn test_custom_filter() {
        let filters = Filters::new(vec![FilterSpec::custom("type", |filter, cell| {
            cell.as_str() != filter.as_str()
        })])
        .unwrap();
        let mut values = BTreeMap::new();
        values.insert("type".to_string(), Value::from("b"));
        assert_eq!(filters.apply(rows(), &values).len(), 2);
    }

    #[test]
    fn test_checkbox_filter() {
        let data = vec![
            Row::new(Record::new().set("public", true)),
            Row::new(Record::new().set("public", false)),
        ];
        let filters = Filters::new(vec![FilterSpec::checkbox("public")]).unwrap();
        let mut values = BTreeMap::new();
        values.insert("public".to_string(), Value::from(true));
        assert_eq!(filters.apply(data, &values).len(), 1);
    }

    #[test]
    fn test_duplicate_filter_rejected() {
        let result = Filters::new(vec![FilterSpec::select("status"), FilterSpec::checkbox("status")]);
        assert_eq!(result.unwrap_err(), ConfigError::DuplicateColumn("status".into()));
    }
}
