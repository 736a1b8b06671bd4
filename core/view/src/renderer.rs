//! FILENAME: core/view/src/renderer.rs
//! PURPOSE: Cell, header and filter rendering strategies.
//! CONTEXT: Renderers read from the item and the CoreContext only. They
//! never change the Table or the item.

use crate::error::ViewError;
use crate::html::builder::{limit_query, HtmlBuilder};
use crate::table::Column;
use engine::{get_value, CoreContext, EngineError, Item, LimitParams, Order, PropertyError, Sort, Value};

// ============================================================================
// CELL RENDERERS
// ============================================================================

/// Produces the display value of one cell.
pub trait CellRenderer {
    fn render(&self, item: &dyn Item, property: &str, rowcount: usize) -> Result<Value, ViewError>;
}

/// Reads a property off an item, reporting a missing one as an unknown
/// property.
pub fn property_value(item: &dyn Item, property: &str) -> Result<Value, ViewError> {
    get_value(item, property).map_err(|e| match e {
        PropertyError::NotFound(p) => ViewError::Engine(EngineError::UnknownProperty(p)),
        other => other.into(),
    })
}

/// The property value as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCellRenderer;

impl CellRenderer for BasicCellRenderer {
    fn render(&self, item: &dyn Item, property: &str, _rowcount: usize) -> Result<Value, ViewError> {
        property_value(item, property)
    }
}

/// Dates and date-times formatted with a chrono pattern. Other values pass
/// through.
#[derive(Debug, Clone)]
pub struct DateCellRenderer {
    pattern: String,
}

impl DateCellRenderer {
    pub fn new(pattern: impl Into<String>) -> Self {
        DateCellRenderer {
            pattern: pattern.into(),
        }
    }
}

impl CellRenderer for DateCellRenderer {
    fn render(&self, item: &dyn Item, property: &str, _rowcount: usize) -> Result<Value, ViewError> {
        let value = property_value(item, property)?;
        Ok(match value.format_date(&self.pattern) {
            Some(text) => Value::Text(text),
            None => value,
        })
    }
}

/// Renders with a closure over the item and the 1-based row count.
pub struct FnCellRenderer {
    render: Box<dyn Fn(&dyn Item, usize) -> Value>,
}

impl FnCellRenderer {
    pub fn new(render: impl Fn(&dyn Item, usize) -> Value + 'static) -> Self {
        FnCellRenderer {
            render: Box::new(render),
        }
    }
}

impl CellRenderer for FnCellRenderer {
    fn render(&self, item: &dyn Item, _property: &str, rowcount: usize) -> Result<Value, ViewError> {
        Ok((self.render)(item, rowcount))
    }
}

// ============================================================================
// HEADER & FILTER RENDERERS
// ============================================================================

/// Produces the header cell of a column.
pub trait HeaderRenderer {
    fn render(&self, column: &Column, sortable: bool, ctx: &CoreContext<'_>) -> String;
}

/// Produces the filter cell of a filterable column.
pub trait FilterRenderer {
    fn render(&self, column: &Column, ctx: &CoreContext<'_>) -> String;
}

/// Title cell. Sortable columns link to the next order of their sort cycle
/// and go back to the first page.
#[derive(Debug, Clone, Default)]
pub struct HtmlHeaderRenderer {
    style_class: Option<String>,
}

impl HtmlHeaderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }
}

impl HeaderRenderer for HtmlHeaderRenderer {
    fn render(&self, column: &Column, sortable: bool, ctx: &CoreContext<'_>) -> String {
        let mut html = HtmlBuilder::new();
        html.td(2).style_class(self.style_class.as_deref());

        if !sortable {
            html.close().text(&column.title()).td_end();
            return html.build();
        }

        let property = column.property();
        let sort_set = ctx.limit().sort_set();
        let current = sort_set.order_of(property);
        let next = current.next_in(column.sort_order());
        let position = sort_set
            .get_sort(property)
            .map(|s| s.position)
            .unwrap_or_else(|| sort_set.sorts().iter().map(|s| s.position.saturating_add(1)).max().unwrap_or(0));

        let mut link = ctx.limit().clone();
        link.add_sort(Sort::new(position, property, next));
        link.set_page(1);

        html.attr("data-order", current.to_param()).close();
        html.open_inline("a")
            .attr("href", &limit_query(&link))
            .close()
            .text(&column.title())
            .end_inline("a");
        if current != Order::None {
            html.open_inline("span")
                .attr("class", &format!("sort-{}", current.to_param()))
                .close()
                .end_inline("span");
        }
        html.td_end();
        html.build()
    }
}

/// Text input named after the column's filter parameter, holding the
/// current filter value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFilterRenderer;

impl FilterRenderer for HtmlFilterRenderer {
    fn render(&self, column: &Column, ctx: &CoreContext<'_>) -> String {
        let limit = ctx.limit();
        let name = LimitParams::new(limit.id()).filter_key(column.property());
        let value = limit.filter_set().get_filter_value(column.property()).unwrap_or("");

        let mut html = HtmlBuilder::new();
        html.td(2).close();
        html.open_inline("input")
            .attr("type", "text")
            .attr("name", &name)
            .attr("value", value)
            .self_close();
        html.td_end();
        html.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine::{Filter, Limit, Record};

    fn president() -> Record {
        Record::new()
            .with("term", 2i64)
            .with("born", NaiveDate::from_ymd_opt(1735, 10, 30).unwrap())
            .with_child("name", Record::new().with("firstName", "John"))
    }

    #[test]
    fn basic_renderer_reads_nested_properties() {
        let value = BasicCellRenderer.render(&president(), "name.firstName", 1).unwrap();
        assert_eq!(value, Value::text("John"));
    }

    #[test]
    fn basic_renderer_reports_unknown_properties() {
        let err = BasicCellRenderer.render(&president(), "party", 1).unwrap_err();
        assert!(matches!(err, ViewError::Engine(EngineError::UnknownProperty(p)) if p == "party"));
    }

    #[test]
    fn date_renderer_formats_dates_only() {
        let renderer = DateCellRenderer::new("%m/%Y");
        assert_eq!(renderer.render(&president(), "born", 1).unwrap(), Value::text("10/1735"));
        assert_eq!(renderer.render(&president(), "term", 1).unwrap(), Value::Int(2));
    }

    #[test]
    fn fn_renderer_sees_the_row_count() {
        let renderer = FnCellRenderer::new(|_, rowcount| Value::Int(rowcount as i64 * 10));
        assert_eq!(renderer.render(&president(), "ignored", 3).unwrap(), Value::Int(30));
    }

    #[test]
    fn header_links_to_next_order() {
        let data = vec![president()];
        let mut limit = Limit::new("pres");
        limit.set_page(3);
        let ctx = CoreContext::new(&data, limit);
        let column = Column::new("name.firstName");

        let html = HtmlHeaderRenderer::new().render(&column, true, &ctx);
        assert!(html.contains("data-order=\"none\""));
        assert!(html.contains("pres_s_0_name.firstName=asc"));
        assert!(html.contains("pres_p_=1"));
        assert!(html.contains(">First Name</a>"));
    }

    #[test]
    fn header_link_after_the_last_sort_position_saturates() {
        let data = vec![president()];
        let mut limit = Limit::new("pres");
        limit.add_sort(Sort::new(u32::MAX, "term", Order::Asc));
        let ctx = CoreContext::new(&data, limit);

        let html = HtmlHeaderRenderer::new().render(&Column::new("career"), true, &ctx);
        assert!(html.contains("pres_s_4294967295_career=asc"));
        assert!(html.contains("pres_s_4294967295_term=asc"));
    }

    #[test]
    fn unsortable_header_is_plain_text() {
        let data: Vec<Record> = Vec::new();
        let ctx = CoreContext::new(&data, Limit::new("pres"));
        let html = HtmlHeaderRenderer::new().render(&Column::new("term"), false, &ctx);
        assert_eq!(html, "\n\t\t<td>Term</td>");
    }

    #[test]
    fn filter_cell_carries_current_value() {
        let data: Vec<Record> = Vec::new();
        let mut limit = Limit::new("pres");
        limit.add_filter(Filter::new("career", "Lawyer"));
        let ctx = CoreContext::new(&data, limit);
        let html = HtmlFilterRenderer.render(&Column::new("career"), &ctx);
        assert!(html.contains("name=\"pres_f_career\""));
        assert!(html.contains("value=\"Lawyer\""));
    }
}
