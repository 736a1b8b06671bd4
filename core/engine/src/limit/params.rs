//! FILENAME: core/engine/src/limit/params.rs
//! PURPOSE: The flat request parameter protocol for Limit state.
//! CONTEXT: The transport layer hands over plain string key/value pairs.
//! Every key is prefixed with the Limit id so several tables can share one
//! request:
//!
//! - `{id}_p_`                      page
//! - `{id}_mr_`                     max rows (0 or negative shows all)
//! - `{id}_s_{position}_{property}` sort order (`asc`, `desc`, `none`)
//! - `{id}_f_{property}`            filter value (empty removes the filter)
//! - `{id}_e_`                      export type
//! - `{id}_clear_`                  drop every filter before applying new ones

use super::{ExportType, Filter, Limit, Order, RowSelect, Sort};
use crate::{log_debug, log_warn};
use std::collections::HashMap;

// ============================================================================
// KEY BUILDERS
// ============================================================================

/// Builds and recognizes the parameter keys of one Limit id.
#[derive(Debug, Clone)]
pub struct LimitParams {
    id: String,
}

impl LimitParams {
    pub fn new(id: &str) -> Self {
        LimitParams { id: id.to_string() }
    }

    pub fn page_key(&self) -> String {
        format!("{}_p_", self.id)
    }

    pub fn max_rows_key(&self) -> String {
        format!("{}_mr_", self.id)
    }

    pub fn sort_key(&self, position: u32, property: &str) -> String {
        format!("{}_s_{}_{}", self.id, position, property)
    }

    pub fn filter_key(&self, property: &str) -> String {
        format!("{}_f_{}", self.id, property)
    }

    pub fn export_key(&self) -> String {
        format!("{}_e_", self.id)
    }

    pub fn clear_key(&self) -> String {
        format!("{}_clear_", self.id)
    }

    fn sort_prefix(&self) -> String {
        format!("{}_s_", self.id)
    }

    fn filter_prefix(&self) -> String {
        format!("{}_f_", self.id)
    }

    /// Flattens a Limit into parameters. Export type is left out; exports are
    /// always an explicit request.
    pub fn encode(&self, limit: &Limit) -> Vec<(String, String)> {
        let row_select = limit.row_select();
        let mut params = vec![
            (self.page_key(), row_select.page().to_string()),
            (self.max_rows_key(), row_select.max_rows().to_string()),
        ];
        for sort in limit.sort_set().sorts() {
            params.push((
                self.sort_key(sort.position, &sort.property),
                sort.order.to_param().to_string(),
            ));
        }
        for filter in limit.filter_set().filters() {
            params.push((self.filter_key(&filter.property), filter.value.clone()));
        }
        params
    }
}

// ============================================================================
// ACTION FACTORY
// ============================================================================

/// Reads the actions for one Limit out of the request parameters.
pub struct LimitActionFactory<'a> {
    keys: LimitParams,
    params: &'a HashMap<String, String>,
}

impl<'a> LimitActionFactory<'a> {
    pub fn new(id: &str, params: &'a HashMap<String, String>) -> Self {
        LimitActionFactory {
            keys: LimitParams::new(id),
            params,
        }
    }

    pub fn page(&self) -> Option<u32> {
        let raw = self.params.get(&self.keys.page_key())?;
        match raw.trim().parse::<u32>() {
            Ok(page) => Some(page),
            Err(_) => {
                log_warn!("LIMIT", "ignoring malformed page '{}'", raw);
                None
            }
        }
    }

    pub fn max_rows(&self) -> Option<u32> {
        let raw = self.params.get(&self.keys.max_rows_key())?;
        match raw.trim().parse::<i64>() {
            Ok(max_rows) => Some(RowSelect::max_rows_from(max_rows)),
            Err(_) => {
                log_warn!("LIMIT", "ignoring malformed max rows '{}'", raw);
                None
            }
        }
    }

    pub fn export_type(&self) -> Option<ExportType> {
        let raw = self.params.get(&self.keys.export_key())?;
        let export_type = ExportType::from_param(raw);
        if export_type.is_none() {
            log_warn!("LIMIT", "ignoring unknown export type '{}'", raw);
        }
        export_type
    }

    pub fn clear_filters(&self) -> bool {
        self.params
            .get(&self.keys.clear_key())
            .map(|v| v.trim() == "true")
            .unwrap_or(false)
    }

    /// Sort actions ordered by position.
    pub fn sorts(&self) -> Vec<Sort> {
        let prefix = self.keys.sort_prefix();
        let mut sorts: Vec<Sort> = self
            .params
            .iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(&prefix)?;
                let (position, property) = rest.split_once('_')?;
                let Ok(position) = position.parse::<u32>() else {
                    log_warn!("LIMIT", "ignoring sort key with bad position '{}'", key);
                    return None;
                };
                let Some(order) = Order::from_param(value) else {
                    log_warn!("LIMIT", "ignoring sort '{}' with unknown order '{}'", key, value);
                    return None;
                };
                if property.is_empty() {
                    return None;
                }
                Some(Sort::new(position, property, order))
            })
            .collect();
        sorts.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.property.cmp(&b.property)));
        sorts
    }

    /// Filter actions ordered by property. An empty value means "remove".
    pub fn filters(&self) -> Vec<Filter> {
        let prefix = self.keys.filter_prefix();
        let mut filters: Vec<Filter> = self
            .params
            .iter()
            .filter_map(|(key, value)| {
                let property = key.strip_prefix(&prefix)?;
                if property.is_empty() {
                    return None;
                }
                Some(Filter::new(property, value.trim()))
            })
            .collect();
        filters.sort_by(|a, b| a.property.cmp(&b.property));
        filters
    }

    /// Applies every action found in the parameters to the Limit.
    pub fn apply(&self, limit: &mut Limit) {
        if self.clear_filters() {
            limit.filter_set_mut().clear();
        }
        for filter in self.filters() {
            if filter.value.is_empty() {
                limit.filter_set_mut().remove_filter(&filter.property);
            } else {
                log_debug!("LIMIT", "filter {}={}", filter.property, filter.value);
                limit.add_filter(filter);
            }
        }
        for sort in self.sorts() {
            log_debug!("LIMIT", "sort {} {} at {}", sort.property, sort.order.to_param(), sort.position);
            limit.add_sort(sort);
        }
        if let Some(max_rows) = self.max_rows() {
            limit.set_max_rows(max_rows);
        }
        if let Some(page) = self.page() {
            limit.set_page(page);
        }
        limit.set_export_type(self.export_type());
    }
}
