//! FILENAME: core/view/src/table.rs
//! PURPOSE: The declarative Table / Row / Column model.
//! CONTEXT: A Table is built once per request and only read while the page
//! is resolved and rendered. Column strategies are materialized lazily on
//! first read and cannot be replaced afterwards.

use crate::editor::{BasicCellEditor, CellEditor};
use crate::error::ViewError;
use crate::renderer::{
    BasicCellRenderer, CellRenderer, FilterRenderer, HeaderRenderer, HtmlFilterRenderer,
    HtmlHeaderRenderer,
};
use crate::validation::Validation;
use engine::Order;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// COLUMN
// ============================================================================

pub struct Column {
    property: String,
    title: Option<String>,
    sortable: Option<bool>,
    filterable: Option<bool>,
    editable: Option<bool>,
    sort_order: Vec<Order>,
    width: Option<String>,
    style_class: Option<String>,
    cell_renderer: OnceCell<Box<dyn CellRenderer>>,
    cell_editor: OnceCell<Box<dyn CellEditor>>,
    header_renderer: OnceCell<Box<dyn HeaderRenderer>>,
    filter_renderer: OnceCell<Box<dyn FilterRenderer>>,
    validations: Vec<Validation>,
}

/// Writes a strategy into an empty cell; a cell that was already read or
/// set keeps its strategy.
fn bind<T: ?Sized>(
    cell: &OnceCell<Box<T>>,
    value: Box<T>,
    strategy: &'static str,
    property: &str,
) -> Result<(), ViewError> {
    cell.set(value).map_err(|_| ViewError::StrategyAlreadyBound {
        strategy,
        property: property.to_string(),
    })
}

impl Column {
    pub fn new(property: impl Into<String>) -> Self {
        Column {
            property: property.into(),
            title: None,
            sortable: None,
            filterable: None,
            editable: None,
            sort_order: Order::CYCLE.to_vec(),
            width: None,
            style_class: None,
            cell_renderer: OnceCell::new(),
            cell_editor: OnceCell::new(),
            header_renderer: OnceCell::new(),
            filter_renderer: OnceCell::new(),
            validations: Vec::new(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// The explicit title, or one derived from the property.
    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => derive_title(&self.property),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    // ========================================================================
    // OVERRIDES (column > row > true)
    // ========================================================================

    pub fn sortable(&self) -> Option<bool> {
        self.sortable
    }

    pub fn set_sortable(&mut self, sortable: Option<bool>) {
        self.sortable = sortable;
    }

    pub fn filterable(&self) -> Option<bool> {
        self.filterable
    }

    pub fn set_filterable(&mut self, filterable: Option<bool>) {
        self.filterable = filterable;
    }

    pub fn editable(&self) -> Option<bool> {
        self.editable
    }

    pub fn set_editable(&mut self, editable: Option<bool>) {
        self.editable = editable;
    }

    pub fn is_sortable(&self, row: &Row) -> bool {
        self.sortable.or(row.sortable).unwrap_or(true)
    }

    pub fn is_filterable(&self, row: &Row) -> bool {
        self.filterable.or(row.filterable).unwrap_or(true)
    }

    pub fn is_editable(&self, row: &Row) -> bool {
        self.editable.or(row.editable).unwrap_or(true)
    }

    // ========================================================================
    // PRESENTATION
    // ========================================================================

    /// Orders the header walks through; `[None, Asc, Desc]` by default.
    pub fn sort_order(&self) -> &[Order] {
        &self.sort_order
    }

    pub fn set_sort_order(&mut self, orders: &[Order]) {
        if !orders.is_empty() {
            self.sort_order = orders.to_vec();
        }
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = Some(width.into());
    }

    pub fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    pub fn set_style_class(&mut self, class: impl Into<String>) {
        self.style_class = Some(class.into());
    }

    // ========================================================================
    // STRATEGIES
    // ========================================================================

    pub fn cell_renderer(&self) -> &dyn CellRenderer {
        self.cell_renderer
            .get_or_init(|| Box::new(BasicCellRenderer))
            .as_ref()
    }

    pub fn set_cell_renderer(&mut self, renderer: impl CellRenderer + 'static) -> Result<(), ViewError> {
        bind(&self.cell_renderer, Box::new(renderer), "cell renderer", &self.property)
    }

    pub fn cell_editor(&self) -> &dyn CellEditor {
        self.cell_editor
            .get_or_init(|| Box::new(BasicCellEditor::new()))
            .as_ref()
    }

    /// The editor bound to this column, if any was bound yet.
    pub fn bound_cell_editor(&self) -> Option<&dyn CellEditor> {
        self.cell_editor.get().map(|editor| editor.as_ref())
    }

    pub fn set_cell_editor(&mut self, editor: impl CellEditor + 'static) -> Result<(), ViewError> {
        bind(&self.cell_editor, Box::new(editor), "cell editor", &self.property)
    }

    pub fn header_renderer(&self) -> &dyn HeaderRenderer {
        self.header_renderer
            .get_or_init(|| Box::new(HtmlHeaderRenderer::new()))
            .as_ref()
    }

    pub fn set_header_renderer(&mut self, renderer: impl HeaderRenderer + 'static) -> Result<(), ViewError> {
        bind(&self.header_renderer, Box::new(renderer), "header renderer", &self.property)
    }

    pub fn filter_renderer(&self) -> &dyn FilterRenderer {
        self.filter_renderer
            .get_or_init(|| Box::new(HtmlFilterRenderer))
            .as_ref()
    }

    pub fn set_filter_renderer(&mut self, renderer: impl FilterRenderer + 'static) -> Result<(), ViewError> {
        bind(&self.filter_renderer, Box::new(renderer), "filter renderer", &self.property)
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    pub fn add_validation(&mut self, validation: Validation) {
        self.validations.push(validation);
    }

    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.property.hash(state);
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("property", &self.property)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("editable", &self.editable)
            .finish()
    }
}

/// `name.firstName` -> `First Name`: the last path segment split on camel
/// case and underscores, each word capitalized.
pub fn derive_title(property: &str) -> String {
    let leaf = property.rsplit('.').next().unwrap_or(property);
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in leaf.chars() {
        if c == '_' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ============================================================================
// ROW
// ============================================================================

#[derive(Debug, Default)]
pub struct Row {
    columns: Vec<Column>,
    unique_properties: Vec<String>,
    sortable: Option<bool>,
    filterable: Option<bool>,
    editable: Option<bool>,
    highlighter: Option<bool>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Properties are unique within a row.
    pub fn add_column(&mut self, column: Column) -> Result<&mut Column, ViewError> {
        if self.columns.contains(&column) {
            return Err(ViewError::DuplicateColumn(column.property));
        }
        self.columns.push(column);
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, property: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.property == property)
    }

    pub fn column_mut(&mut self, property: &str) -> Result<&mut Column, ViewError> {
        self.columns
            .iter_mut()
            .find(|c| c.property == property)
            .ok_or_else(|| ViewError::UnknownColumn(property.to_string()))
    }

    pub fn column_properties(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.property.as_str()).collect()
    }

    /// Properties that together identify an item for editing.
    pub fn unique_properties(&self) -> &[String] {
        &self.unique_properties
    }

    pub fn set_unique_properties(&mut self, properties: &[&str]) {
        self.unique_properties = properties.iter().map(|p| p.to_string()).collect();
    }

    pub fn sortable(&self) -> Option<bool> {
        self.sortable
    }

    pub fn set_sortable(&mut self, sortable: Option<bool>) {
        self.sortable = sortable;
    }

    pub fn filterable(&self) -> Option<bool> {
        self.filterable
    }

    pub fn set_filterable(&mut self, filterable: Option<bool>) {
        self.filterable = filterable;
    }

    pub fn editable(&self) -> Option<bool> {
        self.editable
    }

    pub fn set_editable(&mut self, editable: Option<bool>) {
        self.editable = editable;
    }

    /// Row-level highlighter setting; `None` defers to the preference.
    pub fn highlighter(&self) -> Option<bool> {
        self.highlighter
    }

    pub fn set_highlighter(&mut self, highlighter: bool) {
        self.highlighter = Some(highlighter);
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Default)]
pub struct Table {
    caption: Option<String>,
    theme: Option<String>,
    width: Option<String>,
    style_class: Option<String>,
    row: Row,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with one default column per property.
    pub fn with_columns(properties: &[&str]) -> Result<Self, ViewError> {
        if properties.is_empty() {
            return Err(ViewError::NoColumns);
        }
        let mut table = Table::new();
        for property in properties {
            table.row.add_column(Column::new(*property))?;
        }
        Ok(table)
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn row_mut(&mut self) -> &mut Row {
        &mut self.row
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = Some(theme.into());
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = Some(width.into());
    }

    pub fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    pub fn set_style_class(&mut self, class: impl Into<String>) {
        self.style_class = Some(class.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DateCellRenderer;
    use engine::{Record, Value};

    #[test]
    fn duplicate_columns_are_rejected() {
        let mut row = Row::new();
        row.add_column(Column::new("term")).unwrap();
        let err = row.add_column(Column::new("term").with_title("Term")).unwrap_err();
        assert!(matches!(err, ViewError::DuplicateColumn(p) if p == "term"));
        assert_eq!(row.columns().len(), 1);
    }

    #[test]
    fn titles_are_derived_from_properties() {
        assert_eq!(derive_title("name.firstName"), "First Name");
        assert_eq!(derive_title("born"), "Born");
        assert_eq!(derive_title("term_of_office"), "Term Of Office");
        assert_eq!(Column::new("career").with_title("Job").title(), "Job");
    }

    #[test]
    fn column_overrides_win_over_row() {
        let choices = [None, Some(true), Some(false)];
        for row_value in choices {
            for column_value in choices {
                let mut row = Row::new();
                row.set_sortable(row_value);
                row.set_filterable(row_value);
                row.set_editable(row_value);
                let mut column = Column::new("term");
                column.set_sortable(column_value);
                column.set_filterable(column_value);
                column.set_editable(column_value);

                let expected = column_value.or(row_value).unwrap_or(true);
                assert_eq!(column.is_sortable(&row), expected);
                assert_eq!(column.is_filterable(&row), expected);
                assert_eq!(column.is_editable(&row), expected);
            }
        }
    }

    #[test]
    fn strategies_cannot_be_rebound_after_first_read() {
        let mut column = Column::new("born");
        column.set_cell_renderer(DateCellRenderer::new("%Y")).unwrap();
        assert!(matches!(
            column.set_cell_renderer(DateCellRenderer::new("%m")),
            Err(ViewError::StrategyAlreadyBound { strategy: "cell renderer", .. })
        ));

        let other = Column::new("term");
        let item = Record::new().with("term", 2i64);
        assert_eq!(other.cell_renderer().render(&item, "term", 1).unwrap(), Value::Int(2));
        let mut other = other;
        assert!(other.set_cell_renderer(DateCellRenderer::new("%Y")).is_err());
        assert!(other.set_cell_editor(crate::editor::TextCellEditor).is_ok());
    }

    #[test]
    fn column_identity_is_the_property() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Column::new("term").with_title("A"));
        set.insert(Column::new("term").with_title("B"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn table_from_properties() {
        let table = Table::with_columns(&["name.firstName", "term"]).unwrap();
        assert_eq!(table.row().column_properties(), vec!["name.firstName", "term"]);
        assert!(matches!(Table::with_columns(&[]), Err(ViewError::NoColumns)));
        assert!(matches!(Table::with_columns(&["a", "a"]), Err(ViewError::DuplicateColumn(_))));
    }

    #[test]
    fn unknown_column_lookup_is_an_error() {
        let mut table = Table::with_columns(&["term"]).unwrap();
        assert!(table.row().column("career").is_none());
        assert!(matches!(table.row_mut().column_mut("career"), Err(ViewError::UnknownColumn(_))));
    }
}
