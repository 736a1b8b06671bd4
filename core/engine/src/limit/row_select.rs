//! FILENAME: core/engine/src/limit/row_select.rs
//! PURPOSE: Pagination state and the derived row bounds.

use serde::{Deserialize, Serialize};

/// Page, page size and total rows.
///
/// A `max_rows` of 0 means "show all". `total_rows` is only trustworthy on a
/// RowSelect returned by `resolve`, after the filter pass has counted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelect {
    page: u32,
    max_rows: u32,
    total_rows: usize,
}

impl RowSelect {
    /// An unresolved selection. The page is stored as requested.
    pub fn new(page: u32, max_rows: u32) -> Self {
        RowSelect {
            page: page.max(1),
            max_rows,
            total_rows: 0,
        }
    }

    /// Converts a raw page size from the outside world; zero or negative
    /// means "show all".
    pub fn max_rows_from(raw: i64) -> u32 {
        if raw <= 0 {
            0
        } else {
            u32::try_from(raw).unwrap_or(u32::MAX)
        }
    }

    /// Applies a filtered row count: clamps the page into
    /// `[1, last_page]` and fixes the total.
    pub fn resolve(&self, total_rows: usize) -> RowSelect {
        let mut resolved = RowSelect {
            page: self.page,
            max_rows: self.max_rows,
            total_rows,
        };
        let last = resolved.last_page();
        resolved.page = resolved.page.clamp(1, last);
        resolved
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn max_rows(&self) -> u32 {
        self.max_rows
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn is_show_all(&self) -> bool {
        self.max_rows == 0
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn set_max_rows(&mut self, max_rows: u32) {
        self.max_rows = max_rows;
    }

    /// `ceil(total_rows / max_rows)`; a show-all selection has one page.
    pub fn page_count(&self) -> u32 {
        if self.total_rows == 0 {
            return 0;
        }
        if self.is_show_all() {
            return 1;
        }
        let pages = self.total_rows.div_ceil(self.max_rows as usize);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest valid page, never below 1.
    pub fn last_page(&self) -> u32 {
        self.page_count().max(1)
    }

    /// Index of the first row on the page.
    pub fn row_start(&self) -> usize {
        if self.is_show_all() {
            return 0;
        }
        let start = (self.page as usize - 1).saturating_mul(self.max_rows as usize);
        start.min(self.total_rows)
    }

    /// Exclusive index past the last row on the page.
    pub fn row_end(&self) -> usize {
        if self.is_show_all() {
            return self.total_rows;
        }
        self.row_start()
            .saturating_add(self.max_rows as usize)
            .min(self.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_a_middle_page() {
        let rs = RowSelect::new(2, 10).resolve(35);
        assert_eq!(rs.row_start(), 10);
        assert_eq!(rs.row_end(), 20);
        assert_eq!(rs.page_count(), 4);
    }

    #[test]
    fn last_partial_page() {
        let rs = RowSelect::new(3, 2).resolve(5);
        assert_eq!(rs.page(), 3);
        assert_eq!(rs.row_start(), 4);
        assert_eq!(rs.row_end(), 5);
    }

    #[test]
    fn page_beyond_the_end_is_clamped() {
        let rs = RowSelect::new(99, 2).resolve(5);
        assert_eq!(rs.page(), 3);
        assert_eq!(rs.row_start(), 4);
    }

    #[test]
    fn empty_collection_resolves_to_page_one() {
        let rs = RowSelect::new(4, 10).resolve(0);
        assert_eq!(rs.page(), 1);
        assert_eq!(rs.row_start(), 0);
        assert_eq!(rs.row_end(), 0);
        assert_eq!(rs.page_count(), 0);
        assert_eq!(rs.last_page(), 1);
    }

    #[test]
    fn show_all_returns_every_row() {
        let rs = RowSelect::new(3, RowSelect::max_rows_from(-1)).resolve(42);
        assert!(rs.is_show_all());
        assert_eq!(rs.page(), 1);
        assert_eq!(rs.row_start(), 0);
        assert_eq!(rs.row_end(), 42);
    }

    #[test]
    fn bounds_hold_for_every_page() {
        for total in 1..40usize {
            for max in 1..7u32 {
                let last = total.div_ceil(max as usize) as u32;
                for page in 1..=last + 2 {
                    let rs = RowSelect::new(page, max).resolve(total);
                    assert!(rs.row_start() < rs.row_end());
                    assert!(rs.row_end() <= total);
                    assert_eq!(rs.last_page(), last);
                    assert_eq!(rs.page(), page.min(last));
                }
            }
        }
    }
}
