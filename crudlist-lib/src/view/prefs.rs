//! Persisted list preferences

use serde::Deserialize;
use serde::Serialize;

use super::Direction;
use super::ViewState;

/// User preferences of a list, persisted between sessions.
///
/// Unset fields fall back to the column and list defaults.
///
/// # Example
///
/// ```
/// use crudlist_lib::view::ListPrefs;
///
/// let prefs: ListPrefs = serde_json::from_str(r#"{"rowsPerPage": 25, "orderDirection": "desc"}"#).unwrap();
/// assert_eq!(prefs.rows_per_page, Some(25));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPrefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<Direction>,
}

impl ListPrefs {
    /// Captures the persistable part of a view state.
    pub fn capture(state: &ViewState) -> Self {
        Self {
            visible_columns: Some(state.visible_columns.clone()),
            columns_order: Some(state.columns_order.clone()),
            rows_per_page: Some(state.rows_per_page),
            order_by: Some(state.order_by.clone()),
            order_direction: Some(state.order_direction),
        }
    }
}
