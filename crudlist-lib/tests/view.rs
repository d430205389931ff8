//! Integration tests for the list view engine.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use crudlist_lib::crud::RemoveFn;
use crudlist_lib::error::ConfigError;
use crudlist_lib::error::DeleteError;
use crudlist_lib::error::Error;
use crudlist_lib::model::Record;
use crudlist_lib::model::Row;
use crudlist_lib::model::UniqueIdentifier;
use crudlist_lib::model::Value;
use crudlist_lib::view::Column;
use crudlist_lib::view::Direction;
use crudlist_lib::view::FilterSpec;
use crudlist_lib::view::ListOptions;
use crudlist_lib::view::ListPrefs;
use crudlist_lib::view::ListView;

fn numbered(n: i64) -> Vec<Row> {
    (0..n)
        .map(|i| Row::new(Record::new().set("id", i).set("name", format!("row-{i}"))))
        .collect()
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().filter_map(|row| row.get("id").and_then(Value::as_i64)).collect()
}

fn simple_view(options: ListOptions) -> ListView {
    ListView::new(vec![Column::new("id", "ID"), Column::new("name", "Name")], vec![], options).unwrap()
}

#[derive(Default)]
struct RecordingRemover {
    removed: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl RecordingRemover {
    fn failing(ids: &[&str]) -> Self {
        Self {
            removed: Mutex::default(),
            failing: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[async_trait]
impl RemoveFn for RecordingRemover {
    async fn remove(&self, id: &str) -> Result<(), DeleteError> {
        if self.failing.contains(id) {
            return Err(DeleteError::new(id, "conflict"));
        }
        self.removed.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

// =============================================================================
// Sorting
// =============================================================================

fn sort_fixture() -> ListView {
    let mut view = ListView::new(
        vec![Column::new("id", "ID"), Column::new("n", "N")],
        vec![],
        ListOptions::new(),
    )
    .unwrap();
    view.set_data(
        [(1, 3), (2, 1), (3, 2)]
            .into_iter()
            .map(|(id, n)| Row::new(Record::new().set("id", id).set("n", n)))
            .collect(),
    );
    view
}

#[test]
fn test_sort_by_column() {
    let mut view = sort_fixture();

    view.request_sort("n").unwrap();
    assert_eq!(view.state().order_direction, Direction::Desc);
    assert_eq!(ids(&view.visible_rows()), vec![1, 3, 2]);

    view.request_sort("n").unwrap();
    assert_eq!(view.state().order_direction, Direction::Asc);
    assert_eq!(ids(&view.visible_rows()), vec![2, 3, 1]);
}

#[test]
fn test_external_sort_skips_local_sorting() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut view = ListView::new(
        vec![Column::new("id", "ID"), Column::new("n", "N")],
        vec![],
        ListOptions::new().on_sort_change(move |column, direction| {
            sink.lock().unwrap().push((column.to_string(), direction));
        }),
    )
    .unwrap();
    view.set_data(sort_fixture().data().to_vec());

    view.request_sort("n").unwrap();
    assert_eq!(ids(&view.visible_rows()), vec![1, 2, 3]);
    assert_eq!(seen.lock().unwrap().as_slice(), &[("n".to_string(), Direction::Desc)]);
}

#[test]
fn test_sort_unknown_column() {
    let mut view = sort_fixture();
    assert_eq!(
        view.request_sort("nope").unwrap_err(),
        ConfigError::UnknownColumn("nope".into())
    );
}

// =============================================================================
// Search and filters
// =============================================================================

fn server_fixture(filters: Vec<FilterSpec>) -> ListView {
    let mut view = ListView::new(
        vec![
            Column::new("name", "Name"),
            Column::new("status", "Status"),
            Column::new("type", "Type"),
        ],
        filters,
        ListOptions::new().with_search_target("name"),
    )
    .unwrap();
    view.set_data(vec![
        Row::new(Record::new().set("name", "web-01").set("status", "active").set("type", "a")),
        Row::new(Record::new().set("name", "web-02").set("status", "active").set("type", "b")),
        Row::new(Record::new().set("name", "db-01").set("status", "active").set("type", "c")),
        Row::new(Record::new().set("name", "db-02").set("status", "error").set("type", "a")),
        Row::new(Record::new().set("name", "cache").set("status", "active").set("type", "b")),
    ]);
    view
}

#[test]
fn test_filters_compose_with_and() {
    let mut view = server_fixture(vec![FilterSpec::select("status"), FilterSpec::multiselect("type")]);
    view.update_filter("status", "active").unwrap();
    view.update_filter("type", vec!["a", "b"]).unwrap();

    let names: Vec<_> = view
        .filtered_rows()
        .iter()
        .filter_map(|row| row.get_str("name").map(str::to_string))
        .collect();
    assert_eq!(names, vec!["cache", "web-01", "web-02"]);

    view.clear_filter("type").unwrap();
    assert_eq!(view.filtered_rows().len(), 4);
    view.reset_filters();
    assert_eq!(view.filtered_rows().len(), 5);
}

#[test]
fn test_search_then_filter() {
    let mut view = server_fixture(vec![FilterSpec::select("status")]);
    view.search("DB");
    assert_eq!(view.filtered_rows().len(), 2);
    view.update_filter("status", "error").unwrap();
    assert_eq!(view.filtered_rows().len(), 1);
}

#[test]
fn test_search_ignored_without_target() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(3));
    view.search("row-1");
    assert_eq!(view.state().search_term, "");
    assert_eq!(view.filtered_rows().len(), 3);
}

#[test]
fn test_unknown_filter() {
    let mut view = server_fixture(vec![]);
    assert_eq!(
        view.update_filter("status", "active").unwrap_err(),
        ConfigError::UnknownFilter("status".into())
    );
}

#[test]
fn test_remote_filter_notifies() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut view = server_fixture(vec![
        FilterSpec::select("status").with_on_change(move |value| sink.lock().unwrap().push(value.clone())),
    ]);

    view.update_filter("status", "error").unwrap();
    assert_eq!(view.filtered_rows().len(), 5);

    view.reset_filters();
    assert_eq!(seen.lock().unwrap().as_slice(), &[Value::from("error"), Value::Null]);
}

// =============================================================================
// Pagination and selection
// =============================================================================

#[test]
fn test_second_page() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(25));
    view.change_page(1);
    assert_eq!(ids(&view.visible_rows()), (10..20).collect::<Vec<_>>());

    let info = view.page_info();
    assert_eq!((info.count, info.page, info.rows_per_page), (25, 1, 10));
}

#[test]
fn test_rows_per_page() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let mut view = simple_view(ListOptions::new().on_rows_per_page_change(move |n| *sink.lock().unwrap() = Some(n)));
    view.set_data(numbered(60));

    view.change_rows_per_page(25).unwrap();
    assert_eq!(view.visible_rows().len(), 25);
    assert_eq!(*seen.lock().unwrap(), Some(25));
    assert_eq!(view.change_rows_per_page(0).unwrap_err(), ConfigError::InvalidRowsPerPage);
}

#[test]
fn test_pagination_off() {
    let mut view = simple_view(ListOptions::new().with_pagination(false));
    view.set_data(numbered(25));
    assert_eq!(view.visible_rows().len(), 25);
    assert!(view.output().page.is_none());
}

#[test]
fn test_selection_survives_paging() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(25));
    let row = view.visible_rows()[3].clone();

    assert!(view.toggle_row(&row));
    view.change_page(2);
    assert!(view.is_selected(&row));
    assert_eq!(view.output().num_selected, 1);
}

#[test]
fn test_select_all_scoped_to_visible_rows() {
    let mut view = server_fixture(vec![FilterSpec::select("type")]);
    let outside = view.data()[2].clone();
    view.toggle_row(&outside);

    view.update_filter("type", "a").unwrap();
    view.select_all_visible(true);
    assert_eq!(view.selected().len(), 3);
    assert!(view.are_all_selected(&view.visible_rows()));
    assert!(view.output().all_selected);

    view.select_all_visible(false);
    assert_eq!(view.selected().len(), 1);
    assert!(view.is_selected(&outside));
}

#[test]
fn test_selection_disabled_without_checkboxes() {
    let mut view = simple_view(ListOptions::new().with_checkboxes(false));
    view.set_data(numbered(3));
    let row = view.data()[0].clone();
    assert!(!view.toggle_row(&row));
    view.select_all_visible(true);
    assert!(view.selected().is_empty());
}

#[test]
fn test_refresh_prunes_selection() {
    let mut view = simple_view(ListOptions::new());
    let data = numbered(3);
    view.set_data(data.clone());
    view.select_all_visible(true);

    // Same contents, new rows
    view.set_data(numbered(3));
    assert!(view.selected().is_empty());

    view.set_data(data.clone());
    view.toggle_row(&data[0]);
    view.toggle_row(&data[1]);
    view.set_data(data[1..].to_vec());
    assert_eq!(view.selected().len(), 1);
    assert!(view.is_selected(&data[1]));
}

// =============================================================================
// Delete and edit
// =============================================================================

#[tokio::test]
async fn test_delete_last_row_of_last_page() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(11));
    view.change_page(1);
    let last = view.visible_rows();
    assert_eq!(last.len(), 1);
    view.toggle_row(&last[0]);

    let remover = RecordingRemover::default();
    assert_eq!(view.delete_selected(&remover).await.unwrap(), 1);
    assert_eq!(remover.removed.lock().unwrap().as_slice(), &["10".to_string()]);
    assert_eq!(view.state().page, 0);
    assert!(view.selected().is_empty());
}

#[tokio::test]
async fn test_delete_full_page() {
    let mut view = simple_view(ListOptions::new().with_rows_per_page(5));
    view.set_data(numbered(15));
    view.change_page(1);
    view.select_all_visible(true);

    let remover = RecordingRemover::default();
    assert_eq!(view.delete_selected(&remover).await.unwrap(), 5);
    assert_eq!(view.state().page, 0);
}

#[tokio::test]
async fn test_delete_partial_failure() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(11));
    view.change_page(1);
    let rows = view.data()[8..].to_vec();
    for row in &rows {
        view.toggle_row(row);
    }
    assert_eq!(view.selected().len(), 3);

    let remover = RecordingRemover::failing(&["9"]);
    let err = view.delete_selected(&remover).await.unwrap_err();
    let failure = match err {
        Error::Delete(failure) => failure,
        other => panic!("expected a delete failure, got {other:?}"),
    };
    assert_eq!(failure.deleted, 2);
    assert_eq!(failure.failed_ids().collect::<Vec<_>>(), vec!["9"]);

    assert_eq!(ids(view.selected()), vec![9]);
    assert_eq!(view.state().page, 1);
}

#[tokio::test]
async fn test_delete_nothing_selected() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(3));
    let remover = RecordingRemover::default();
    assert_eq!(view.delete_selected(&remover).await.unwrap(), 0);
    assert!(remover.removed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_custom_identifier() {
    let mut view = simple_view(ListOptions::new().with_unique_identifier(UniqueIdentifier::field("name")));
    view.set_data(numbered(2));
    view.select_all_visible(true);

    assert_eq!(
        view.delete_confirmation().as_deref(),
        Some("This will permanently delete the following: row-0, row-1")
    );
    let remover = RecordingRemover::default();
    view.delete_selected(&remover).await.unwrap();
    assert_eq!(remover.removed.lock().unwrap().as_slice(), &["row-0".to_string(), "row-1".to_string()]);
}

#[test]
fn test_edit_selected() {
    let mut view = simple_view(ListOptions::new());
    view.set_data(numbered(5));
    assert_eq!(view.edit_selected().unwrap(), None);
    assert_eq!(view.delete_confirmation(), None);

    let rows = view.data().to_vec();
    view.toggle_row(&rows[3]);
    view.toggle_row(&rows[1]);
    assert_eq!(view.edit_selected().unwrap().as_deref(), Some("3"));
}

#[test]
fn test_missing_identifier() {
    let mut view = simple_view(ListOptions::new());
    let row = Row::new(Record::new().set("name", "orphan"));
    view.set_data(vec![row.clone()]);
    view.toggle_row(&row);
    assert_eq!(
        view.edit_selected().unwrap_err(),
        ConfigError::MissingIdentifier("id".into())
    );
}

// =============================================================================
// Columns
// =============================================================================

fn column_fixture(options: ListOptions) -> ListView {
    ListView::new(
        vec![
            Column::new("a", "A"),
            Column::new("b", "B"),
            Column::new("c", "C"),
            Column::new("secret", "Secret").excluded(),
        ],
        vec![],
        options,
    )
    .unwrap()
}

#[test]
fn test_switch_columns() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut view = column_fixture(ListOptions::new().on_columns_change(move |_, order| {
        *sink.lock().unwrap() = order.to_vec();
    }));

    view.switch_columns("a", "c").unwrap();
    let order: Vec<_> = view.sorted_visible_columns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "a"]);
    assert_eq!(seen.lock().unwrap()[..3], ["c", "b", "a"]);
    assert_eq!(
        view.switch_columns("a", "zzz").unwrap_err(),
        ConfigError::UnknownColumn("zzz".into())
    );
}

#[test]
fn test_toggle_column() {
    let mut view = column_fixture(ListOptions::new());
    view.toggle_column("b").unwrap();
    let visible: Vec<_> = view.sorted_visible_columns().iter().map(|c| c.id.clone()).collect();
    assert_eq!(visible, vec!["a", "c"]);

    let picker: Vec<_> = view.picker_columns().iter().map(|(c, on)| (c.id.clone(), *on)).collect();
    assert_eq!(
        picker,
        vec![("a".to_string(), true), ("b".to_string(), false), ("c".to_string(), true)]
    );
}

#[test]
fn test_toggle_column_needs_editing() {
    let mut view = column_fixture(ListOptions::new().with_column_editing(false));
    view.toggle_column("b").unwrap();
    assert_eq!(view.sorted_visible_columns().len(), 3);
}

// =============================================================================
// Output, prefs and subscriptions
// =============================================================================

#[test]
fn test_output_renders_cells() {
    let mut view = ListView::new(
        vec![
            Column::new("name", "Name"),
            Column::new("ram", "RAM").with_render(|value, _| format!("{value} MB")),
            Column::new("public", "Public"),
            Column::new("spec.disk", "Disk"),
            Column::new("tags", "Tags"),
        ],
        vec![],
        ListOptions::new(),
    )
    .unwrap();
    let spec: serde_json::Value = serde_json::json!({ "disk": 20 });
    view.set_data(vec![Row::new(
        Record::new()
            .set("name", "m1.small")
            .set("ram", 2048)
            .set("public", true)
            .set("spec", spec)
            .set("tags", vec!["a", "b"]),
    )]);

    let output = view.output();
    assert_eq!(output.header(), vec!["Name", "RAM", "Public", "Disk", "Tags"]);
    assert_eq!(output.cells(), vec![vec!["m1.small", "2048 MB", "true", "20", "a, b"]]);
    assert!(output.empty_text.is_none());
}

#[test]
fn test_output_empty() {
    let view = simple_view(ListOptions::new().with_empty_text("No servers"));
    assert_eq!(view.output().empty_text.as_deref(), Some("No servers"));
    assert!(!view.output().all_selected);
}

#[test]
fn test_prefs_round_trip() {
    let mut view = column_fixture(ListOptions::new());
    view.request_sort("b").unwrap();
    view.switch_columns("a", "b").unwrap();
    view.change_rows_per_page(50).unwrap();
    let prefs = view.prefs();

    let json = serde_json::to_string(&prefs).unwrap();
    let restored: ListPrefs = serde_json::from_str(&json).unwrap();
    let view = ListView::with_prefs(
        vec![
            Column::new("a", "A"),
            Column::new("b", "B"),
            Column::new("c", "C"),
            Column::new("secret", "Secret").excluded(),
        ],
        vec![],
        ListOptions::new(),
        &restored,
    )
    .unwrap();
    assert_eq!(view.state().order_by, "b");
    assert_eq!(view.state().order_direction, Direction::Desc);
    assert_eq!(view.state().rows_per_page, 50);
    assert_eq!(view.state().columns_order[..2], ["b", "a"]);
}

#[tokio::test]
async fn test_subscribe() {
    let mut view = simple_view(ListOptions::new());
    let mut rx = view.subscribe();
    view.change_page(3);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().page, 3);
}
