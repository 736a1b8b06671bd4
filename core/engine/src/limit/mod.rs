//! FILENAME: core/engine/src/limit/mod.rs
//! Limit - the serializable description of the user's current intent.
//!
//! A Limit carries the sort, filter, page and export state of one table,
//! identified by an id that stays stable across a browsing session. It is
//! built (or restored) once per request, mutated by request parameters,
//! consumed by the CoreContext and optionally saved for the next request.
//!
//! Layers:
//! - `sort`, `filter`, `row_select`, `export_type`: the state parts
//! - `params`: the flat key/value parameter protocol
//! - `state`: restoring and saving Limits by id

pub mod export_type;
pub mod filter;
pub mod params;
pub mod row_select;
pub mod sort;
pub mod state;

pub use export_type::ExportType;
pub use filter::{Filter, FilterSet};
pub use params::{LimitActionFactory, LimitParams};
pub use row_select::RowSelect;
pub use sort::{Order, Sort, SortSet};
pub use state::{LimitFactory, LimitStore, MemoryLimitStore};

use serde::{Deserialize, Serialize};

/// Default page size when nothing else is configured.
pub const DEFAULT_MAX_ROWS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    id: String,
    sort_set: SortSet,
    filter_set: FilterSet,
    row_select: RowSelect,
    #[serde(default)]
    export_type: Option<ExportType>,
    /// Set once a resolution pass has applied this Limit.
    #[serde(skip)]
    complete: bool,
}

impl Limit {
    pub fn new(id: impl Into<String>) -> Self {
        Limit {
            id: id.into(),
            sort_set: SortSet::new(),
            filter_set: FilterSet::new(),
            row_select: RowSelect::new(1, DEFAULT_MAX_ROWS),
            export_type: None,
            complete: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // ========================================================================
    // SORTS & FILTERS
    // ========================================================================

    pub fn sort_set(&self) -> &SortSet {
        &self.sort_set
    }

    pub fn sort_set_mut(&mut self) -> &mut SortSet {
        &mut self.sort_set
    }

    pub fn add_sort(&mut self, sort: Sort) {
        self.sort_set.add_sort(sort);
    }

    pub fn filter_set(&self) -> &FilterSet {
        &self.filter_set
    }

    pub fn filter_set_mut(&mut self) -> &mut FilterSet {
        &mut self.filter_set
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filter_set.add_filter(filter);
    }

    // ========================================================================
    // PAGING
    // ========================================================================

    pub fn row_select(&self) -> &RowSelect {
        &self.row_select
    }

    /// Sets the requested page. Out-of-range pages are clamped during
    /// resolution, not here.
    pub fn set_page(&mut self, page: u32) {
        self.row_select.set_page(page);
    }

    /// Sets the page size; 0 shows all rows.
    pub fn set_max_rows(&mut self, max_rows: u32) {
        self.row_select.set_max_rows(max_rows);
    }

    pub(crate) fn set_row_select(&mut self, row_select: RowSelect) {
        self.row_select = row_select;
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    pub fn export_type(&self) -> Option<ExportType> {
        self.export_type
    }

    pub fn set_export_type(&mut self, export_type: Option<ExportType>) {
        self.export_type = export_type;
    }

    /// True when the request asks for an export instead of the page view.
    pub fn is_exportable(&self) -> bool {
        self.export_type.is_some()
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Flattens the Limit into the request parameter protocol.
    pub fn to_params(&self) -> Vec<(String, String)> {
        LimitParams::new(&self.id).encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_limit_is_first_page_with_default_size() {
        let limit = Limit::new("presidents");
        assert_eq!(limit.id(), "presidents");
        assert_eq!(limit.row_select().page(), 1);
        assert_eq!(limit.row_select().max_rows(), DEFAULT_MAX_ROWS);
        assert!(!limit.is_exportable());
        assert!(!limit.is_complete());
    }

    #[test]
    fn setting_a_page_is_not_clamped() {
        let mut limit = Limit::new("t");
        limit.set_page(500);
        assert_eq!(limit.row_select().page(), 500);
    }

    #[test]
    fn export_type_makes_the_limit_exportable() {
        let mut limit = Limit::new("t");
        limit.set_export_type(Some(ExportType::Csv));
        assert!(limit.is_exportable());
    }

    #[test]
    fn limit_state_serializes_without_complete_flag() {
        let mut limit = Limit::new("t");
        limit.add_sort(Sort::new(0, "age", Order::Asc));
        limit.add_filter(Filter::new("name", "jo"));
        limit.mark_complete();

        let json = serde_json::to_string(&limit).unwrap();
        let restored: Limit = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.sort_set(), limit.sort_set());
        assert_eq!(restored.filter_set(), limit.filter_set());
        assert!(!restored.is_complete());
    }
}
