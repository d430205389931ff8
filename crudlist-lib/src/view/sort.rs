//! Sorting

use serde::Deserialize;
use serde::Serialize;

use super::Column;
use crate::model::Row;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Direction after clicking a column header.
    ///
    /// A click sorts descending, unless the column is already sorted
    /// descending, which flips it to ascending.
    pub fn toggled(current_column: &str, current: Direction, clicked: &str) -> Direction {
        if current_column == clicked && current == Direction::Desc {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }
}

/// Sorts rows by a column.
///
/// The comparator is called with swapped arguments, `(b, a)`, which sorts
/// descending. That order is kept for [`Direction::Desc`] and reversed for
/// [`Direction::Asc`].
pub fn sort_rows(rows: &[Row], column: &Column, direction: Direction) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| column.compare(column.cell(b), column.cell(a)));
    if direction == Direction::Asc {
        sorted.reverse();
    }
    sorted
}
