//! View state and its transitions

use std::collections::BTreeMap;
use std::collections::HashSet;

use super::Column;
use super::Direction;
use super::ListOptions;
use super::ListPrefs;
use super::SelectionSet;
use crate::error::ConfigError;
use crate::model::Row;
use crate::model::Value;

/// Interaction state of a list.
///
/// Everything shown is derived from the data and this state. The state only
/// changes through [`reduce`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Ids of the columns shown in the grid.
    pub visible_columns: Vec<String>,
    /// Every column id, in display order.
    pub columns_order: Vec<String>,
    /// Id of the sort column.
    pub order_by: String,
    pub order_direction: Direction,
    /// Current page index (0-based).
    pub page: usize,
    pub rows_per_page: usize,
    pub selected: SelectionSet,
    pub search_term: String,
    /// Filter values by column id. A missing entry means the filter is unset.
    pub filter_values: BTreeMap<String, Value>,
}

impl ViewState {
    /// Builds the initial state from the columns, seeded by saved preferences.
    ///
    /// Saved column ids that no longer exist are dropped, and columns missing
    /// from a saved order are appended, so `columns_order` always holds every
    /// column exactly once.
    pub fn initial(columns: &[Column], options: &ListOptions, prefs: &ListPrefs) -> Result<Self, ConfigError> {
        let first = columns.first().ok_or(ConfigError::NoColumns)?;
        let mut ids = HashSet::with_capacity(columns.len());
        for column in columns {
            if !ids.insert(column.id.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.id.clone()));
            }
        }

        let visible_columns = match &prefs.visible_columns {
            Some(saved) => known(saved, &ids),
            None => columns
                .iter()
                .filter(|column| column.is_displayed())
                .map(|column| column.id.clone())
                .collect(),
        };

        let mut columns_order = prefs
            .columns_order
            .as_deref()
            .map(|saved| known(saved, &ids))
            .unwrap_or_default();
        for column in columns {
            if !columns_order.contains(&column.id) {
                columns_order.push(column.id.clone());
            }
        }

        let order_by = prefs.order_by.clone().unwrap_or_else(|| first.id.clone());
        if !ids.contains(order_by.as_str()) {
            return Err(ConfigError::UnknownColumn(order_by));
        }

        let rows_per_page = prefs.rows_per_page.unwrap_or(options.rows_per_page);
        if rows_per_page == 0 {
            return Err(ConfigError::InvalidRowsPerPage);
        }

        Ok(Self {
            visible_columns,
            columns_order,
            order_by,
            order_direction: prefs.order_direction.unwrap_or_default(),
            page: 0,
            rows_per_page,
            selected: SelectionSet::new(),
            search_term: String::new(),
            filter_values: BTreeMap::new(),
        })
    }

    /// Returns `true` if the column is shown in the grid.
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.visible_columns.iter().any(|id| id == column_id)
    }
}

fn known(saved: &[String], ids: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(saved.len());
    for id in saved {
        if ids.contains(id.as_str()) && seen.insert(id.as_str()) {
            kept.push(id.clone());
        } else {
            log::warn!("ignoring saved column \"{id}\"");
        }
    }
    kept
}

/// A state transition.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Header click on a column.
    RequestSort(String),
    ChangePage(usize),
    ChangeRowsPerPage(usize),
    ToggleRow(Row),
    /// Adds (`checked`) or removes exactly the given rows.
    SelectRows { rows: Vec<Row>, checked: bool },
    /// Drops selected rows missing from a fresh data snapshot.
    PruneSelection(Vec<Row>),
    Search(String),
    UpdateFilter { column_id: String, value: Value },
    ClearFilter(String),
    ResetFilters,
    ToggleColumn(String),
    SwitchColumns { src: String, dest: String },
    /// Removed rows leave the selection and the page moves to `page`.
    Deleted { rows: Vec<Row>, page: usize },
}

/// Applies an event to a state.
///
/// Events naming unknown columns leave the state as is.
pub fn reduce(mut state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::RequestSort(column_id) => {
            state.order_direction = Direction::toggled(&state.order_by, state.order_direction, &column_id);
            state.order_by = column_id;
        }
        ViewEvent::ChangePage(page) => state.page = page,
        ViewEvent::ChangeRowsPerPage(rows_per_page) => state.rows_per_page = rows_per_page,
        ViewEvent::ToggleRow(row) => {
            state.selected.toggle(&row);
        }
        ViewEvent::SelectRows { rows, checked } => {
            if checked {
                state.selected.select_all(&rows);
            } else {
                state.selected.deselect_all(&rows);
            }
        }
        ViewEvent::PruneSelection(data) => state.selected.prune(&data),
        ViewEvent::Search(term) => state.search_term = term,
        ViewEvent::UpdateFilter { column_id, value } => {
            state.filter_values.insert(column_id, value);
        }
        ViewEvent::ClearFilter(column_id) => {
            state.filter_values.remove(&column_id);
        }
        ViewEvent::ResetFilters => state.filter_values.clear(),
        ViewEvent::ToggleColumn(column_id) => {
            if let Some(i) = state.visible_columns.iter().position(|id| *id == column_id) {
                state.visible_columns.remove(i);
            } else {
                state.visible_columns.push(column_id);
            }
        }
        ViewEvent::SwitchColumns { src, dest } => {
            let order = &mut state.columns_order;
            if let (Some(a), Some(b)) = (
                order.iter().position(|id| *id == src),
                order.iter().position(|id| *id == dest),
            ) {
                order.swap(a, b);
            }
        }
        ViewEvent::Deleted { rows, page } => {
            state.selected.deselect_all(&rows);
            state.page = page;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("a", "A"),
            Column::new("b", "B"),
            Column::new("c", "C").hidden(),
            Column::new("d", "D").excluded(),
        ]
    }

    fn state() -> ViewState {
        ViewState::initial(&columns(), &ListOptions::default(), &ListPrefs::default()).unwrap()
    }

    #[test]
    fn test_initial_defaults() {
        let state = state();
        assert_eq!(state.visible_columns, vec!["a", "b"]);
        assert_eq!(state.columns_order, vec!["a", "b", "c", "d"]);
        assert_eq!(state.order_by, "a");
        assert_eq!(state.order_direction, Direction::Asc);
        assert_eq!(state.rows_per_page, 10);
    }

    #[test]
    fn test_initial_from_prefs() {
        let prefs = ListPrefs {
            visible_columns: Some(vec!["c".into(), "gone".into()]),
            columns_order: Some(vec!["c".into(), "a".into(), "a".into()]),
            order_by: Some("b".into()),
            order_direction: Some(Direction::Desc),
            rows_per_page: Some(25),
        };
        let state = ViewState::initial(&columns(), &ListOptions::default(), &prefs).unwrap();
        assert_eq!(state.visible_columns, vec!["c"]);
        assert_eq!(state.columns_order, vec!["c", "a", "b", "d"]);
        assert_eq!(state.order_by, "b");
        assert_eq!(state.rows_per_page, 25);
    }

    #[test]
    fn test_initial_errors() {
        let options = ListOptions::default();
        let prefs = ListPrefs::default();
        assert_eq!(ViewState::initial(&[], &options, &prefs).unwrap_err(), ConfigError::NoColumns);

        let dup = vec![Column::new("a", "A"), Column::new("a", "A2")];
        assert_eq!(
            ViewState::initial(&dup, &options, &prefs).unwrap_err(),
            ConfigError::DuplicateColumn("a".into())
        );

        let prefs = ListPrefs {
            order_by: Some("zzz".into()),
            ..Default::default()
        };
        assert_eq!(
            ViewState::initial(&columns(), &options, &prefs).unwrap_err(),
            ConfigError::UnknownColumn("zzz".into())
        );
    }

    #[test]
    fn test_sort_toggle() {
        let state = reduce(state(), ViewEvent::RequestSort("b".into()));
        assert_eq!((state.order_by.as_str(), state.order_direction), ("b", Direction::Desc));
        let state = reduce(state, ViewEvent::RequestSort("b".into()));
        assert_eq!(state.order_direction, Direction::Asc);
        let state = reduce(state, ViewEvent::RequestSort("b".into()));
        assert_eq!(state.order_direction, Direction::Desc);
    }

    #[test]
    fn test_rows_per_page_keeps_page() {
        let state = reduce(state(), ViewEvent::ChangePage(4));
        let state = reduce(state, ViewEvent::ChangeRowsPerPage(100));
        assert_eq!(state.page, 4);
    }

    #[test]
    fn test_switch_columns() {
        let state = reduce(
            state(),
            ViewEvent::SwitchColumns {
                src: "a".into(),
                dest: "c".into(),
            },
        );
        assert_eq!(state.columns_order, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_toggle_column_keeps_order() {
        let state = reduce(state(), ViewEvent::ToggleColumn("a".into()));
        assert_eq!(state.visible_columns, vec!["b"]);
        let state = reduce(state, ViewEvent::ToggleColumn("a".into()));
        assert_eq!(state.visible_columns, vec!["b", "a"]);
        assert_eq!(state.columns_order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filters() {
        let state = reduce(
            state(),
            ViewEvent::UpdateFilter {
                column_id: "a".into(),
                value: Value::from("x"),
            },
        );
        let state = reduce(
            state,
            ViewEvent::UpdateFilter {
                column_id: "b".into(),
                value: Value::from(true),
            },
        );
        let state = reduce(state, ViewEvent::ClearFilter("a".into()));
        assert_eq!(state.filter_values.len(), 1);
        let state = reduce(state, ViewEvent::ResetFilters);
        assert!(state.filter_values.is_empty());
    }

    #[test]
    fn test_deleted() {
        let rows: Vec<Row> = (0..3).map(|i| Row::new(Record::new().set("id", i as i64))).collect();
        let state = reduce(
            state(),
            ViewEvent::SelectRows {
                rows: rows.clone(),
                checked: true,
            },
        );
        let state = reduce(state, ViewEvent::ChangePage(1));
        let state = reduce(
            state,
            ViewEvent::Deleted {
                rows: rows[..2].to_vec(),
                page: 0,
            },
        );
        assert_eq!(state.page, 0);
        assert_eq!(state.selected.len(), 1);
        assert!(state.selected.is_selected(&rows[2]));
    }
}
