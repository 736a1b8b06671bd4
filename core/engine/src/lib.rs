//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the table resolution engine.
//! CONTEXT: Re-exports public types and modules for use by the view and
//! worksheet crates.

pub mod comparator;
pub mod context;
pub mod error;
pub mod limit;
pub mod logging;
pub mod matcher;
pub mod messages;
pub mod preferences;
pub mod property;
pub mod value;

// Re-export commonly used types at the crate root
pub use comparator::{CaseInsensitiveComparator, ComparatorRegistry, NaturalComparator, ValueComparator};
pub use context::CoreContext;
pub use error::{EngineError, PropertyError};
pub use limit::{
    ExportType, Filter, FilterSet, Limit, LimitActionFactory, LimitFactory, LimitParams, LimitStore,
    MemoryLimitStore, Order, RowSelect, Sort, SortSet, DEFAULT_MAX_ROWS,
};
pub use matcher::{
    BooleanFilterMatcher, DateFilterMatcher, FilterMatcher, MatcherKey, MatcherRegistry,
    NumberFilterMatcher, StringFilterMatcher,
};
pub use messages::{format_message, BundleMessages, Messages};
pub use preferences::Preferences;
pub use property::{get_value, resolve, set_value, Item, Items, PropertyPath, Record};
pub use value::{Value, ValueType, DEFAULT_DATE_PATTERN, DEFAULT_DATE_TIME_PATTERN};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn it_resolves_a_request_end_to_end() {
        let data: Vec<Record> = ["Adams", "Washington", "Jefferson", "Madison"]
            .iter()
            .map(|name| Record::new().with("lastName", *name))
            .collect();

        let params: HashMap<String, String> = [
            ("pres_s_0_lastName", "asc"),
            ("pres_mr_", "2"),
            ("pres_p_", "2"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let limit = LimitFactory::new("pres", &params)
            .create_limit(None, DEFAULT_MAX_ROWS)
            .unwrap();
        let ctx = CoreContext::new(&data, limit);

        let names: Vec<String> = ctx
            .page_items()
            .unwrap()
            .iter()
            .map(|item| get_value(*item, "lastName").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Madison", "Washington"]);
        assert_eq!(ctx.total_rows().unwrap(), 4);
    }

    #[test]
    fn it_round_trips_limit_state_through_a_store() {
        let mut store = MemoryLimitStore::new();
        let mut limit = Limit::new("pres");
        limit.add_filter(Filter::new("career", "Lawyer"));
        store.save(&limit).unwrap();

        let restored = store.load("pres").unwrap().unwrap();
        assert_eq!(restored.filter_set(), limit.filter_set());
        assert!(store.load("other").unwrap().is_none());
    }
}
