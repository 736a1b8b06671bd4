//! FILENAME: core/view/src/facade.rs
//! PURPOSE: TableFacade - one entry point that wires a request to a rendered
//! table or an export.
//! CONTEXT: The facade builds its parts lazily and in a fixed order: Limit,
//! Table, CoreContext, view. Once a part exists, the settings it was built
//! from can no longer change; trying to is a TooLate error.

use crate::error::ViewError;
use crate::export::{export, export_view, ExportSink};
use crate::html::{HtmlView, Toolbar};
use crate::table::Table;
use engine::preferences::{DATE_PATTERN, MAX_ROWS};
use engine::{
    log_debug, log_info, ComparatorRegistry, CoreContext, ExportType, FilterMatcher, Items, Limit,
    LimitFactory, LimitStore, MatcherKey, MatcherRegistry, Messages, Preferences, ValueComparator,
    DEFAULT_DATE_PATTERN, DEFAULT_MAX_ROWS,
};
use std::collections::HashMap;

/// What `render` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The interactive markup.
    Html(String),
    /// The export was written to the sink; there is no markup.
    Exported,
}

pub struct TableFacade<'a> {
    id: String,
    params: &'a HashMap<String, String>,
    items: Option<&'a dyn Items>,
    column_properties: Vec<String>,
    max_rows: Option<u32>,
    state_attr: Option<String>,
    store: Option<&'a mut dyn LimitStore>,
    export_types: Vec<ExportType>,

    // overrides only; the defaults are added when the context is built
    matchers: MatcherRegistry,
    comparators: ComparatorRegistry,
    preferences: Preferences,
    messages: Option<Box<dyn Messages>>,

    limit: Option<Limit>,
    table: Option<Table>,
    toolbar: Option<Toolbar>,
    context: Option<CoreContext<'a>>,
}

fn too_late(object: &'static str, stage: &'static str) -> ViewError {
    ViewError::TooLate { object, stage }
}

impl<'a> TableFacade<'a> {
    pub fn new(id: impl Into<String>, params: &'a HashMap<String, String>) -> Self {
        TableFacade {
            id: id.into(),
            params,
            items: None,
            column_properties: Vec::new(),
            max_rows: None,
            state_attr: None,
            store: None,
            export_types: Vec::new(),
            matchers: MatcherRegistry::empty(),
            comparators: ComparatorRegistry::new(),
            preferences: Preferences::new(),
            messages: None,
            limit: None,
            table: None,
            toolbar: None,
            context: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    pub fn set_items(&mut self, items: &'a dyn Items) -> Result<(), ViewError> {
        if self.context.is_some() {
            return Err(too_late("items", "CoreContext"));
        }
        self.items = Some(items);
        Ok(())
    }

    pub fn set_column_properties(&mut self, properties: &[&str]) -> Result<(), ViewError> {
        if self.table.is_some() {
            return Err(too_late("column properties", "Table"));
        }
        self.column_properties = properties.iter().map(|p| p.to_string()).collect();
        Ok(())
    }

    pub fn set_max_rows(&mut self, max_rows: u32) -> Result<(), ViewError> {
        if self.limit.is_some() {
            return Err(too_late("max rows", "Limit"));
        }
        self.max_rows = Some(max_rows);
        Ok(())
    }

    /// Enables restoring the Limit from `store` when the request carries
    /// `{state_attr}=true`.
    pub fn set_state_attr(
        &mut self,
        state_attr: impl Into<String>,
        store: &'a mut dyn LimitStore,
    ) -> Result<(), ViewError> {
        if self.limit.is_some() {
            return Err(too_late("state attribute", "Limit"));
        }
        self.state_attr = Some(state_attr.into());
        self.store = Some(store);
        Ok(())
    }

    pub fn set_export_types(&mut self, export_types: &[ExportType]) -> Result<(), ViewError> {
        if self.toolbar.is_some() {
            return Err(too_late("export types", "Toolbar"));
        }
        self.export_types = export_types.to_vec();
        Ok(())
    }

    pub fn export_types(&self) -> &[ExportType] {
        &self.export_types
    }

    pub fn add_filter_matcher(
        &mut self,
        key: MatcherKey,
        matcher: impl FilterMatcher + 'static,
    ) -> Result<(), ViewError> {
        if self.context.is_some() {
            return Err(too_late("filter matchers", "CoreContext"));
        }
        self.matchers.add_matcher(key, matcher);
        Ok(())
    }

    pub fn add_comparator(
        &mut self,
        property: impl Into<String>,
        comparator: impl ValueComparator + 'static,
    ) -> Result<(), ViewError> {
        if self.context.is_some() {
            return Err(too_late("comparators", "CoreContext"));
        }
        self.comparators.add_comparator(property, comparator);
        Ok(())
    }

    /// Overlays `preferences` on the defaults.
    pub fn set_preferences(&mut self, preferences: &Preferences) -> Result<(), ViewError> {
        if self.limit.is_some() || self.context.is_some() {
            return Err(too_late("preferences", "Limit"));
        }
        self.preferences.merge(preferences);
        Ok(())
    }

    pub fn set_messages(&mut self, messages: impl Messages + 'static) -> Result<(), ViewError> {
        if self.context.is_some() {
            return Err(too_late("messages", "CoreContext"));
        }
        self.messages = Some(Box::new(messages));
        Ok(())
    }

    /// Replaces the Limit the facade would build from the request.
    pub fn set_limit(&mut self, limit: Limit) -> Result<(), ViewError> {
        if self.limit.is_some() {
            return Err(too_late("Limit", "Limit"));
        }
        self.limit = Some(limit);
        Ok(())
    }

    /// Replaces the Table the facade would build from the column properties.
    pub fn set_table(&mut self, table: Table) -> Result<(), ViewError> {
        if self.table.is_some() {
            return Err(too_late("Table", "Table"));
        }
        self.table = Some(table);
        Ok(())
    }

    pub fn set_toolbar(&mut self, toolbar: Toolbar) -> Result<(), ViewError> {
        if self.toolbar.is_some() {
            return Err(too_late("Toolbar", "Toolbar"));
        }
        self.toolbar = Some(toolbar);
        Ok(())
    }

    // ========================================================================
    // PARTS
    // ========================================================================

    fn create_limit(&mut self) -> Result<Limit, ViewError> {
        let default_max_rows = self
            .max_rows
            .or_else(|| {
                self.preferences
                    .get_usize(MAX_ROWS)
                    .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            })
            .unwrap_or(DEFAULT_MAX_ROWS);

        let mut factory = LimitFactory::new(self.id.clone(), self.params);
        if let Some(attr) = &self.state_attr {
            factory = factory.with_state_attr(attr.clone());
        }
        let store = self.store.as_mut().map(|s| &mut **s as &mut dyn LimitStore);
        let mut limit = factory.create_limit(store, default_max_rows)?;

        if limit.is_exportable() {
            limit.set_max_rows(0);
            limit.set_page(1);
        }
        Ok(limit)
    }

    /// The Limit for this request, built on first use.
    pub fn limit(&mut self) -> Result<&Limit, ViewError> {
        let limit = match self.limit.take() {
            Some(limit) => limit,
            None => self.create_limit()?,
        };
        Ok(self.limit.insert(limit))
    }

    fn create_table(&self) -> Result<Table, ViewError> {
        let properties: Vec<&str> = self.column_properties.iter().map(String::as_str).collect();
        Table::with_columns(&properties)
    }

    /// The Table for this request, built from the column properties on
    /// first use.
    pub fn table_mut(&mut self) -> Result<&mut Table, ViewError> {
        let table = match self.table.take() {
            Some(table) => table,
            None => self.create_table()?,
        };
        Ok(self.table.insert(table))
    }

    pub fn toolbar_mut(&mut self) -> &mut Toolbar {
        let export_types = &self.export_types;
        self.toolbar
            .get_or_insert_with(|| Toolbar::with_defaults(export_types))
    }

    fn create_context(&mut self) -> Result<CoreContext<'a>, ViewError> {
        let items = self.items.ok_or(ViewError::MissingItems)?;
        let limit = self.limit()?.clone();

        let date_pattern = self.preferences.get_or(DATE_PATTERN, DEFAULT_DATE_PATTERN);
        let mut matchers = MatcherRegistry::with_date_pattern(date_pattern);
        matchers.extend(std::mem::replace(&mut self.matchers, MatcherRegistry::empty()));

        let mut ctx = CoreContext::new(items, limit)
            .with_matchers(matchers)
            .with_comparators(std::mem::take(&mut self.comparators))
            .with_preferences(self.preferences.clone());
        if let Some(messages) = self.messages.take() {
            ctx = ctx.with_messages(messages);
        }
        log_debug!("FACADE", "created CoreContext for '{}'", self.id);
        Ok(ctx)
    }

    /// The CoreContext for this request, built on first use. Matchers,
    /// comparators and messages are fixed from then on.
    pub fn core_context(&mut self) -> Result<&CoreContext<'a>, ViewError> {
        let ctx = match self.context.take() {
            Some(ctx) => ctx,
            None => self.create_context()?,
        };
        Ok(self.context.insert(ctx))
    }

    /// Takes the Table and CoreContext out, building what is missing. A
    /// failure leaves the parts that already existed in place.
    fn take_parts(&mut self) -> Result<(Table, CoreContext<'a>), ViewError> {
        let table = match self.table.take() {
            Some(table) => table,
            None => self.create_table()?,
        };
        let ctx = match self.context.take() {
            Some(ctx) => Ok(ctx),
            None => self.create_context(),
        };
        match ctx {
            Ok(ctx) => Ok((table, ctx)),
            Err(e) => {
                self.table = Some(table);
                Err(e)
            }
        }
    }

    /// The Table and CoreContext together, for overlays such as the
    /// worksheet that need both.
    pub fn parts(&mut self) -> Result<(&Table, &CoreContext<'a>), ViewError> {
        let (table, ctx) = self.take_parts()?;
        Ok((&*self.table.insert(table), &*self.context.insert(ctx)))
    }

    // ========================================================================
    // RENDER
    // ========================================================================

    /// Exports to `sink` when the request asks for an export, otherwise
    /// returns the interactive markup.
    pub fn render(&mut self, sink: &mut dyn ExportSink) -> Result<RenderOutcome, ViewError> {
        if let Some(export_type) = self.limit()?.export_type() {
            if !self.export_types.contains(&export_type) {
                return Err(ViewError::ExportTypeNotEnabled(export_type));
            }
        }

        let (table, ctx) = self.take_parts()?;
        let export_types = &self.export_types;
        let toolbar = &*self
            .toolbar
            .get_or_insert_with(|| Toolbar::with_defaults(export_types));
        let table = &*self.table.insert(table);
        let ctx = &*self.context.insert(ctx);

        if let Some(export_type) = ctx.limit().export_type() {
            export(export_view(export_type).as_ref(), table, ctx, sink)?;
            return Ok(RenderOutcome::Exported);
        }

        let html = HtmlView::new(table, toolbar, ctx).render()?;
        log_info!(
            "FACADE",
            "rendered '{}' ({} of {} rows)",
            self.id,
            ctx.page_indices()?.len(),
            ctx.total_rows()?
        );
        Ok(RenderOutcome::Html(html))
    }
}
