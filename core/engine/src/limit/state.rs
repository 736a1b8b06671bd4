//! FILENAME: core/engine/src/limit/state.rs
//! PURPOSE: Building a Limit for a request, restoring and saving it by id.
//! CONTEXT: The engine keeps nothing between calls. A host that wants the
//! table to come back in the state the user left it passes a LimitStore in.

use super::{Limit, LimitActionFactory};
use crate::error::EngineError;
use crate::log_debug;
use std::collections::HashMap;

/// Parameter value that asks for the saved Limit instead of a fresh one.
const RESTORE_VALUE: &str = "true";

// ============================================================================
// STORE
// ============================================================================

/// Keyed storage for Limit state.
pub trait LimitStore {
    fn load(&self, id: &str) -> Result<Option<Limit>, EngineError>;
    fn save(&mut self, limit: &Limit) -> Result<(), EngineError>;
}

/// In-process store. Limits are kept as serialized JSON records, the same
/// shape a session or file backed store would hold.
#[derive(Debug, Default)]
pub struct MemoryLimitStore {
    records: HashMap<String, String>,
}

impl MemoryLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw record for an id.
    pub fn record(&self, id: &str) -> Option<&str> {
        self.records.get(id).map(|s| s.as_str())
    }
}

impl LimitStore for MemoryLimitStore {
    fn load(&self, id: &str) -> Result<Option<Limit>, EngineError> {
        match self.records.get(id) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, limit: &Limit) -> Result<(), EngineError> {
        let json = serde_json::to_string(limit)?;
        self.records.insert(limit.id().to_string(), json);
        Ok(())
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Creates the Limit for one table and one request.
pub struct LimitFactory<'a> {
    id: String,
    params: &'a HashMap<String, String>,
    state_attr: Option<String>,
}

impl<'a> LimitFactory<'a> {
    pub fn new(id: impl Into<String>, params: &'a HashMap<String, String>) -> Self {
        LimitFactory {
            id: id.into(),
            params,
            state_attr: None,
        }
    }

    /// Names the request parameter that asks for the saved state
    /// (`{state_attr}=true`).
    pub fn with_state_attr(mut self, state_attr: impl Into<String>) -> Self {
        self.state_attr = Some(state_attr.into());
        self
    }

    fn wants_restore(&self) -> bool {
        self.state_attr
            .as_ref()
            .and_then(|attr| self.params.get(attr))
            .map(|v| v.trim() == RESTORE_VALUE)
            .unwrap_or(false)
    }

    /// Restores the saved Limit when asked to and one exists; otherwise
    /// builds it from the parameters and saves it. The export type always
    /// comes from the current request.
    pub fn create_limit(
        &self,
        store: Option<&mut dyn LimitStore>,
        default_max_rows: u32,
    ) -> Result<Limit, EngineError> {
        let actions = LimitActionFactory::new(&self.id, self.params);

        if let Some(store) = store {
            if self.wants_restore() {
                if let Some(mut limit) = store.load(&self.id)? {
                    log_debug!("LIMIT", "restored limit '{}'", self.id);
                    limit.set_export_type(actions.export_type());
                    return Ok(limit);
                }
            }
            let limit = self.build(&actions, default_max_rows);
            store.save(&limit)?;
            return Ok(limit);
        }

        Ok(self.build(&actions, default_max_rows))
    }

    fn build(&self, actions: &LimitActionFactory<'_>, default_max_rows: u32) -> Limit {
        let mut limit = Limit::new(self.id.clone());
        limit.set_max_rows(default_max_rows);
        actions.apply(&mut limit);
        log_debug!(
            "LIMIT",
            "created limit '{}' page={} maxRows={} sorts={} filters={}",
            self.id,
            limit.row_select().page(),
            limit.row_select().max_rows(),
            limit.sort_set().sorts().len(),
            limit.filter_set().filters().len()
        );
        limit
    }
}
