//! Pagination

use serde::Serialize;

use crate::model::Row;

/// Rows per page when none is configured.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Choices offered for rows per page.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Returns the rows of a page.
///
/// A page past the end is empty.
pub fn paginate(rows: &[Row], page: usize, rows_per_page: usize) -> Vec<Row> {
    let start = page.saturating_mul(rows_per_page).min(rows.len());
    let end = start.saturating_add(rows_per_page).min(rows.len());
    rows[start..end].to_vec()
}

/// Page to show after deleting `deleted` rows out of `count`.
///
/// Steps back one page when the deletion empties the current page: either the
/// whole last page went away, or a full page was deleted.
pub fn page_after_delete(page: usize, rows_per_page: usize, count: usize, deleted: usize) -> usize {
    if count == 0 || deleted == 0 || rows_per_page == 0 {
        return page;
    }
    let last_page = count.div_ceil(rows_per_page) - 1;
    let emptied_last = page == last_page && deleted == count % rows_per_page;
    if emptied_last || deleted == rows_per_page {
        page.saturating_sub(1)
    } else {
        page
    }
}

/// Pagination info for the pager control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Number of rows after search and filters.
    pub count: usize,
    /// Current page index (0-based).
    pub page: usize,
    pub rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
}

impl PageInfo {
    /// Number of pages, at least one.
    pub fn page_count(&self) -> usize {
        if self.rows_per_page == 0 {
            return 1;
        }
        self.count.div_ceil(self.rows_per_page).max(1)
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    /// 1-based range of the rows shown, as `(from, to)`.
    pub fn range(&self) -> (usize, usize) {
        if self.count == 0 {
            return (0, 0);
        }
        let from = (self.page * self.rows_per_page + 1).min(self.count);
        let to = (self.page * self.rows_per_page + self.rows_per_page).min(self.count);
        (from, to)
    }
}
