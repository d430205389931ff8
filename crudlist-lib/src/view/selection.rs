//! Row selection

use std::collections::HashSet;

use crate::model::Row;
use crate::model::RowKey;

/// Selected rows, tracked by identity.
///
/// Two rows with equal fields are distinct unless they are the same row.
/// Insertion order is kept, so the first selected row is well defined.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    rows: Vec<Row>,
    keys: HashSet<RowKey>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a row. Returns `true` if the row is now selected.
    pub fn toggle(&mut self, row: &Row) -> bool {
        if self.keys.remove(&row.key()) {
            self.rows.retain(|r| !r.ptr_eq(row));
            false
        } else {
            self.insert(row);
            true
        }
    }

    /// Adds a row. Returns `false` if it was already selected.
    pub fn insert(&mut self, row: &Row) -> bool {
        if self.keys.insert(row.key()) {
            self.rows.push(row.clone());
            true
        } else {
            false
        }
    }

    /// Adds every given row.
    pub fn select_all(&mut self, rows: &[Row]) {
        for row in rows {
            self.insert(row);
        }
    }

    /// Removes exactly the given rows.
    pub fn deselect_all(&mut self, rows: &[Row]) {
        let keys: HashSet<RowKey> = rows.iter().map(Row::key).collect();
        self.retain(|row| !keys.contains(&row.key()));
    }

    /// Returns `true` if every given row is selected.
    pub fn are_all_selected(&self, rows: &[Row]) -> bool {
        rows.iter().all(|row| self.is_selected(row))
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.keys.contains(&row.key())
    }

    /// Keeps only the rows for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&Row) -> bool) {
        let keys = &mut self.keys;
        self.rows.retain(|row| {
            let keep = f(row);
            if !keep {
                keys.remove(&row.key());
            }
            keep
        });
    }

    /// Drops selected rows that are not part of `data`.
    pub fn prune(&mut self, data: &[Row]) {
        let present: HashSet<RowKey> = data.iter().map(Row::key).collect();
        self.retain(|row| present.contains(&row.key()));
    }

    /// Selected rows, in selection order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// First selected row.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
