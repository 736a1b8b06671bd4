//! FILENAME: core/engine/src/context.rs
//! PURPOSE: CoreContext - resolves a Limit against a borrowed collection.
//! CONTEXT: One resolution pass per request. The pass filters (AND across
//! filters, in FilterSet order), stable-sorts by the active sorts in
//! position order, then clamps the page and slices it. The result is
//! computed on first read and reused for every later read.

use crate::comparator::ComparatorRegistry;
use crate::error::{EngineError, PropertyError};
use crate::limit::{Limit, Order, RowSelect};
use crate::matcher::MatcherRegistry;
use crate::messages::{BundleMessages, Messages};
use crate::preferences::Preferences;
use crate::property::{resolve, Item, Items, PropertyPath};
use crate::value::Value;
use crate::{log_debug, log_enter, log_error, log_exit};
use once_cell::unsync::OnceCell;
use std::cmp::Ordering;

/// Memoized output of one pass.
#[derive(Debug, Clone)]
struct Resolution {
    /// Source indices of the page rows, in display order.
    page: Vec<usize>,
    row_select: RowSelect,
}

pub struct CoreContext<'a> {
    items: &'a dyn Items,
    limit: Limit,
    matchers: MatcherRegistry,
    comparators: ComparatorRegistry,
    preferences: Preferences,
    messages: Box<dyn Messages>,
    resolution: OnceCell<Resolution>,
}

impl<'a> CoreContext<'a> {
    pub fn new(items: &'a dyn Items, limit: Limit) -> Self {
        CoreContext {
            items,
            limit,
            matchers: MatcherRegistry::new(),
            comparators: ComparatorRegistry::new(),
            preferences: Preferences::new(),
            messages: Box::new(BundleMessages::new()),
            resolution: OnceCell::new(),
        }
    }

    pub fn with_matchers(mut self, matchers: MatcherRegistry) -> Self {
        self.matchers = matchers;
        self
    }

    pub fn with_comparators(mut self, comparators: ComparatorRegistry) -> Self {
        self.comparators = comparators;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_messages(mut self, messages: impl Messages + 'static) -> Self {
        self.messages = Box::new(messages);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The Limit as requested. Use `resolved_limit` for the clamped page.
    pub fn limit(&self) -> &Limit {
        &self.limit
    }

    pub fn items(&self) -> &'a dyn Items {
        self.items
    }

    pub fn matchers(&self) -> &MatcherRegistry {
        &self.matchers
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preference(&self, key: &str) -> Option<&str> {
        self.preferences.get(key)
    }

    /// Formatted message; an unknown key comes back as the key itself.
    pub fn message(&self, key: &str, args: &[&str]) -> String {
        self.messages
            .message(key, args)
            .unwrap_or_else(|| key.to_string())
    }

    /// Formatted message, `None` when the key is unknown.
    pub fn find_message(&self, key: &str, args: &[&str]) -> Option<String> {
        self.messages.message(key, args)
    }

    // ========================================================================
    // RESOLUTION OUTPUT
    // ========================================================================

    /// Items on the current page, in display order.
    pub fn page_items(&self) -> Result<Vec<&'a dyn Item>, EngineError> {
        let items = self.items;
        self.resolution()?
            .page
            .iter()
            .map(|&index| item_at(items, index))
            .collect()
    }

    /// Source indices of the page rows.
    pub fn page_indices(&self) -> Result<&[usize], EngineError> {
        Ok(&self.resolution()?.page)
    }

    /// Number of items that passed the filters.
    pub fn total_rows(&self) -> Result<usize, EngineError> {
        Ok(self.resolution()?.row_select.total_rows())
    }

    /// The page selection after clamping.
    pub fn row_select(&self) -> Result<RowSelect, EngineError> {
        Ok(self.resolution()?.row_select)
    }

    /// A copy of the Limit carrying the resolved page and marked complete.
    pub fn resolved_limit(&self) -> Result<Limit, EngineError> {
        let mut limit = self.limit.clone();
        limit.set_row_select(self.row_select()?);
        limit.mark_complete();
        Ok(limit)
    }

    fn resolution(&self) -> Result<&Resolution, EngineError> {
        self.resolution.get_or_try_init(|| self.resolve())
    }

    // ========================================================================
    // PASS
    // ========================================================================

    fn resolve(&self) -> Result<Resolution, EngineError> {
        log_enter!("CORE", "resolve", "id={} items={}", self.limit.id(), self.items.len());
        let filtered = self.filter_pass()?;
        let sorted = self.sort_pass(filtered)?;

        let row_select = self.limit.row_select().resolve(sorted.len());
        let page = sorted[row_select.row_start()..row_select.row_end()].to_vec();

        log_debug!(
            "CORE",
            "resolved '{}': total={} page={}/{} rows=[{}, {})",
            self.limit.id(),
            row_select.total_rows(),
            row_select.page(),
            row_select.last_page(),
            row_select.row_start(),
            row_select.row_end()
        );
        log_exit!("CORE", "resolve");

        Ok(Resolution { page, row_select })
    }

    fn filter_pass(&self) -> Result<Vec<usize>, EngineError> {
        let filters = self
            .limit
            .filter_set()
            .filters()
            .iter()
            .map(|f| Ok((PropertyPath::parse(&f.property)?, f.value.as_str())))
            .collect::<Result<Vec<_>, PropertyError>>()?;

        let mut kept = Vec::with_capacity(self.items.len());
        'items: for index in 0..self.items.len() {
            let item = item_at(self.items, index)?;
            for (path, filter_value) in &filters {
                let value = self.read(item, path)?;
                if value.is_null() {
                    continue 'items;
                }
                let matcher = self
                    .matchers
                    .get_matcher(value.value_type(), path.as_str())
                    .ok_or_else(|| {
                        log_error!(
                            "CORE",
                            "no matcher for {} on '{}'",
                            value.value_type(),
                            path
                        );
                        EngineError::MissingMatcher {
                            value_type: value.value_type(),
                            property: path.to_string(),
                        }
                    })?;
                if !matcher.evaluate(&value, filter_value) {
                    continue 'items;
                }
            }
            kept.push(index);
        }
        Ok(kept)
    }

    fn sort_pass(&self, indices: Vec<usize>) -> Result<Vec<usize>, EngineError> {
        let sorts = self
            .limit
            .sort_set()
            .sorts()
            .iter()
            .filter(|s| s.order != Order::None)
            .map(|s| Ok((PropertyPath::parse(&s.property)?, s.order)))
            .collect::<Result<Vec<_>, PropertyError>>()?;

        if sorts.is_empty() {
            return Ok(indices);
        }

        let mut keyed = Vec::with_capacity(indices.len());
        for index in indices {
            let item = item_at(self.items, index)?;
            let keys = sorts
                .iter()
                .map(|(path, _)| self.read(item, path))
                .collect::<Result<Vec<Value>, EngineError>>()?;
            keyed.push((index, keys));
        }

        // sort_by is stable: ties keep their filtered order
        keyed.sort_by(|(_, a), (_, b)| {
            for (i, (path, order)) in sorts.iter().enumerate() {
                let ordering = self.comparators.get_comparator(path.as_str()).compare(&a[i], &b[i]);
                let ordering = if *order == Order::Desc { ordering.reverse() } else { ordering };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(keyed.into_iter().map(|(index, _)| index).collect())
    }

    fn read(&self, item: &dyn Item, path: &PropertyPath) -> Result<Value, EngineError> {
        resolve(item, path).map_err(|e| match e {
            PropertyError::NotFound(_) => {
                log_error!("CORE", "unknown property '{}' on '{}'", path, self.limit.id());
                EngineError::UnknownProperty(path.to_string())
            }
            other => EngineError::Property(other),
        })
    }
}

fn item_at<'a>(items: &'a dyn Items, index: usize) -> Result<&'a dyn Item, EngineError> {
    items.item(index).ok_or(EngineError::MissingItem {
        index,
        len: items.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::CaseInsensitiveComparator;
    use crate::limit::{Filter, Sort};
    use crate::matcher::{DateFilterMatcher, MatcherKey};
    use crate::property::Record;
    use crate::value::ValueType;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn people(ages: &[i64]) -> Vec<Record> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| Record::new().with("id", i as i64).with("age", *age))
            .collect()
    }

    fn ids(ctx: &CoreContext<'_>) -> Vec<i64> {
        ctx.page_items()
            .unwrap()
            .iter()
            .map(|item| match item.property("id") {
                Some(Value::Int(id)) => id,
                other => panic!("unexpected id {:?}", other),
            })
            .collect()
    }

    fn limit(page: u32, max_rows: u32) -> Limit {
        let mut limit = Limit::new("people");
        limit.set_page(page);
        limit.set_max_rows(max_rows);
        limit
    }

    #[test]
    fn sorted_pages_of_ages() {
        let data = people(&[30, 20, 20, 40, 10]);

        let mut first = limit(1, 2);
        first.add_sort(Sort::new(0, "age", Order::Asc));
        let ctx = CoreContext::new(&data, first);
        // 10 (id 4), then the first 20 (id 1)
        assert_eq!(ids(&ctx), vec![4, 1]);
        assert_eq!(ctx.total_rows().unwrap(), 5);
        assert_eq!(ctx.row_select().unwrap().last_page(), 3);

        let mut third = limit(3, 2);
        third.add_sort(Sort::new(0, "age", Order::Asc));
        let ctx = CoreContext::new(&data, third);
        assert_eq!(ids(&ctx), vec![3]);
    }

    #[test]
    fn page_past_the_end_resolves_to_last_page() {
        let data = people(&[30, 20, 20, 40, 10]);
        let ctx = CoreContext::new(&data, limit(9, 2));
        assert_eq!(ctx.row_select().unwrap().page(), 3);
        assert_eq!(ids(&ctx), vec![4]);
        let resolved = ctx.resolved_limit().unwrap();
        assert!(resolved.is_complete());
        assert_eq!(resolved.row_select().page(), 3);
        assert_eq!(ctx.limit().row_select().page(), 9);
    }

    #[test]
    fn filter_keeps_original_order() {
        let data = people(&[30, 20, 20, 40, 10]);
        let mut l = limit(1, 15);
        l.add_filter(Filter::new("age", "20"));
        let ctx = CoreContext::new(&data, l);
        assert_eq!(ctx.total_rows().unwrap(), 2);
        assert_eq!(ids(&ctx), vec![1, 2]);
    }

    #[test]
    fn filter_order_does_not_change_the_result() {
        let data: Vec<Record> = vec![
            Record::new().with("id", 0i64).with("name", "Ann").with("age", 20i64),
            Record::new().with("id", 1i64).with("name", "Bob").with("age", 20i64),
            Record::new().with("id", 2i64).with("name", "Annie").with("age", 30i64),
        ];

        let mut ab = limit(1, 15);
        ab.add_filter(Filter::new("name", "ann"));
        ab.add_filter(Filter::new("age", "20"));
        let mut ba = limit(1, 15);
        ba.add_filter(Filter::new("age", "20"));
        ba.add_filter(Filter::new("name", "ann"));

        let a = ids(&CoreContext::new(&data, ab));
        let b = ids(&CoreContext::new(&data, ba));
        assert_eq!(a, vec![0]);
        assert_eq!(a, b);
    }

    #[test]
    fn sorting_is_stable_and_repeatable() {
        let data = people(&[5, 1, 5, 1, 5, 1]);
        let mut l = limit(1, 0);
        l.add_sort(Sort::new(0, "age", Order::Desc));
        let once = ids(&CoreContext::new(&data, l.clone()));
        let twice = ids(&CoreContext::new(&data, l));
        assert_eq!(once, vec![0, 2, 4, 1, 3, 5]);
        assert_eq!(once, twice);
    }

    #[test]
    fn secondary_sort_breaks_ties() {
        let data: Vec<Record> = vec![
            Record::new().with("id", 0i64).with("career", "lawyer").with("age", 50i64),
            Record::new().with("id", 1i64).with("career", "General").with("age", 60i64),
            Record::new().with("id", 2i64).with("career", "lawyer").with("age", 40i64),
        ];
        let mut l = limit(1, 0);
        l.add_sort(Sort::new(1, "age", Order::Asc));
        l.add_sort(Sort::new(0, "career", Order::Asc));
        let mut comparators = ComparatorRegistry::new();
        comparators.add_comparator("career", CaseInsensitiveComparator);

        let ctx = CoreContext::new(&data, l).with_comparators(comparators);
        assert_eq!(ids(&ctx), vec![1, 2, 0]);
    }

    #[test]
    fn none_order_is_ignored() {
        let data = people(&[3, 1, 2]);
        let mut l = limit(1, 0);
        l.add_sort(Sort::new(0, "age", Order::None));
        assert_eq!(ids(&CoreContext::new(&data, l)), vec![0, 1, 2]);
    }

    #[test]
    fn empty_collection_gives_empty_first_page() {
        let data: Vec<Record> = Vec::new();
        let ctx = CoreContext::new(&data, limit(4, 10));
        assert!(ctx.page_items().unwrap().is_empty());
        assert_eq!(ctx.total_rows().unwrap(), 0);
        assert_eq!(ctx.row_select().unwrap().page(), 1);
    }

    #[test]
    fn unmatched_filter_gives_empty_page() {
        let data = people(&[1, 2]);
        let mut l = limit(1, 10);
        l.add_filter(Filter::new("age", "99"));
        let ctx = CoreContext::new(&data, l);
        assert!(ctx.page_items().unwrap().is_empty());
    }

    #[test]
    fn unknown_property_is_an_error() {
        let data = people(&[1, 2]);
        let mut l = limit(1, 10);
        l.add_sort(Sort::new(0, "salary", Order::Asc));
        let result = CoreContext::new(&data, l).page_items();
        assert!(matches!(result, Err(EngineError::UnknownProperty(p)) if p == "salary"));
    }

    #[test]
    fn missing_matcher_is_an_error() {
        let data = people(&[1, 2]);
        let mut l = limit(1, 10);
        l.add_filter(Filter::new("age", "1"));
        let ctx = CoreContext::new(&data, l).with_matchers(MatcherRegistry::empty());
        assert!(matches!(
            ctx.total_rows(),
            Err(EngineError::MissingMatcher { value_type: ValueType::Int, .. })
        ));
    }

    #[test]
    fn property_matcher_override_on_dates() {
        let data: Vec<Record> = vec![
            Record::new()
                .with("id", 0i64)
                .with("born", NaiveDate::from_ymd_opt(1732, 2, 22).unwrap()),
            Record::new()
                .with("id", 1i64)
                .with("born", NaiveDate::from_ymd_opt(1735, 10, 30).unwrap()),
        ];
        let mut matchers = MatcherRegistry::new();
        matchers.add_matcher(
            MatcherKey::for_property(ValueType::Date, "born"),
            DateFilterMatcher::new("%m/%Y"),
        );
        let mut l = limit(1, 10);
        l.add_filter(Filter::new("born", "02/1732"));
        let ctx = CoreContext::new(&data, l).with_matchers(matchers);
        assert_eq!(ids(&ctx), vec![0]);
    }

    #[test]
    fn nested_properties_filter_and_sort() {
        let data: Vec<serde_json::Value> = vec![
            serde_json::json!({"id": 0, "name": {"firstName": "John", "lastName": "Adams"}}),
            serde_json::json!({"id": 1, "name": {"firstName": "George", "lastName": "Washington"}}),
            serde_json::json!({"id": 2, "name": {"firstName": "John", "lastName": "Tyler"}}),
        ];
        let mut l = limit(1, 10);
        l.add_filter(Filter::new("name.firstName", "john"));
        l.add_sort(Sort::new(0, "name.lastName", Order::Desc));
        let ctx = CoreContext::new(&data, l);
        assert_eq!(ids(&ctx), vec![2, 0]);
    }

    struct Counting<'c> {
        reads: &'c Cell<usize>,
        age: i64,
    }

    impl Item for Counting<'_> {
        fn property(&self, name: &str) -> Option<Value> {
            self.reads.set(self.reads.get() + 1);
            (name == "age").then_some(Value::Int(self.age))
        }
    }

    #[test]
    fn resolution_runs_once_per_context() {
        let reads = Cell::new(0);
        let data: Vec<Counting<'_>> = [3, 1, 2]
            .iter()
            .map(|age| Counting { reads: &reads, age: *age })
            .collect();
        let mut l = limit(1, 2);
        l.add_sort(Sort::new(0, "age", Order::Asc));
        let ctx = CoreContext::new(&data, l);

        let first = ctx.page_indices().unwrap().to_vec();
        let after_first = reads.get();
        let second = ctx.page_indices().unwrap().to_vec();
        ctx.total_rows().unwrap();
        ctx.page_items().unwrap();

        assert_eq!(first, vec![1, 2]);
        assert_eq!(first, second);
        assert_eq!(reads.get(), after_first);
    }

    #[test]
    fn messages_fall_back_to_the_key() {
        let data = people(&[]);
        let ctx = CoreContext::new(&data, limit(1, 10));
        assert_eq!(ctx.message("no.such.key", &[]), "no.such.key");
        assert_eq!(
            ctx.message(crate::messages::STATUSBAR_NO_RESULTS_FOUND, &[]),
            "There were no results found."
        );
    }
}
