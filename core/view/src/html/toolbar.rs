//! FILENAME: core/view/src/html/toolbar.rs
//! PURPOSE: Paging, page size, clear-filter and export links.

use super::builder::{limit_query, HtmlBuilder};
use crate::error::ViewError;
use engine::messages::{TOOLBAR_CLEAR, TOOLBAR_EXPORT, TOOLBAR_FIRST, TOOLBAR_LAST, TOOLBAR_NEXT, TOOLBAR_PREV};
use engine::{CoreContext, ExportType, Limit, LimitParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    /// Page size choices.
    MaxRows(Vec<u32>),
    ClearFilters,
    Export(ExportType),
    Separator,
}

#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paging links, a separator, clear filters and one link per export type.
    pub fn with_defaults(export_types: &[ExportType]) -> Self {
        let mut toolbar = Toolbar::new();
        toolbar.add(ToolbarItem::FirstPage);
        toolbar.add(ToolbarItem::PrevPage);
        toolbar.add(ToolbarItem::NextPage);
        toolbar.add(ToolbarItem::LastPage);
        toolbar.add(ToolbarItem::Separator);
        toolbar.add(ToolbarItem::ClearFilters);
        for export_type in export_types {
            toolbar.add(ToolbarItem::Export(*export_type));
        }
        toolbar
    }

    pub fn add(&mut self, item: ToolbarItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    pub fn render(&self, ctx: &CoreContext<'_>) -> Result<String, ViewError> {
        let limit = ctx.resolved_limit()?;
        let row_select = *limit.row_select();
        let page = row_select.page();
        let last = row_select.last_page();
        let keys = LimitParams::new(limit.id());

        let mut html = HtmlBuilder::new();
        for item in &self.items {
            match item {
                ToolbarItem::FirstPage => {
                    page_link(&mut html, &limit, 1, page > 1, &ctx.message(TOOLBAR_FIRST, &[]))
                }
                ToolbarItem::PrevPage => page_link(
                    &mut html,
                    &limit,
                    page.saturating_sub(1).max(1),
                    page > 1,
                    &ctx.message(TOOLBAR_PREV, &[]),
                ),
                ToolbarItem::NextPage => page_link(
                    &mut html,
                    &limit,
                    (page + 1).min(last),
                    page < last,
                    &ctx.message(TOOLBAR_NEXT, &[]),
                ),
                ToolbarItem::LastPage => {
                    page_link(&mut html, &limit, last, page < last, &ctx.message(TOOLBAR_LAST, &[]))
                }
                ToolbarItem::MaxRows(choices) => {
                    for max_rows in choices {
                        let mut target = limit.clone();
                        target.set_max_rows(*max_rows);
                        target.set_page(1);
                        let label = max_rows.to_string();
                        link(&mut html, &limit_query(&target), &label, *max_rows != row_select.max_rows());
                    }
                }
                ToolbarItem::ClearFilters => {
                    let mut target = limit.clone();
                    target.filter_set_mut().clear();
                    target.set_page(1);
                    let href = format!("{}&{}=true", limit_query(&target), keys.clear_key());
                    let enabled = limit.filter_set().is_filtered();
                    link(&mut html, &href, &ctx.message(TOOLBAR_CLEAR, &[]), enabled);
                }
                ToolbarItem::Export(export_type) => {
                    let href = format!(
                        "{}&{}={}",
                        limit_query(&limit),
                        keys.export_key(),
                        export_type.to_param()
                    );
                    let label = ctx.message(TOOLBAR_EXPORT, &[export_type.to_param()]);
                    link(&mut html, &href, &label, true);
                }
                ToolbarItem::Separator => {
                    html.open_inline("span").attr("class", "separator").close().end_inline("span");
                }
            }
        }
        Ok(html.build())
    }
}

fn page_link(html: &mut HtmlBuilder, limit: &Limit, page: u32, enabled: bool, label: &str) {
    let mut target = limit.clone();
    target.set_page(page);
    link(html, &limit_query(&target), label, enabled);
}

/// An anchor, or a disabled span with the same label.
fn link(html: &mut HtmlBuilder, href: &str, label: &str, enabled: bool) {
    if enabled {
        html.open_inline("a").attr("href", href).close().text(label).end_inline("a");
    } else {
        html.open_inline("span")
            .attr("class", "disabled")
            .close()
            .text(label)
            .end_inline("span");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Filter, Record};

    fn records(count: i64) -> Vec<Record> {
        (0..count).map(|i| Record::new().with("n", i)).collect()
    }

    #[test]
    fn first_page_disables_backwards_links() {
        let data = records(30);
        let mut limit = Limit::new("t");
        limit.set_max_rows(10);
        let ctx = CoreContext::new(&data, limit);

        let html = Toolbar::with_defaults(&[]).render(&ctx).unwrap();
        assert!(html.contains("<span class=\"disabled\">First</span>"));
        assert!(html.contains("<span class=\"disabled\">Prev</span>"));
        assert!(html.contains("t_p_=2"));
        assert!(html.contains("t_p_=3"));
        assert!(html.contains("<span class=\"disabled\">Clear</span>"));
    }

    #[test]
    fn clear_and_export_links() {
        let data = records(3);
        let mut limit = Limit::new("t");
        limit.add_filter(Filter::new("n", "1"));
        let ctx = CoreContext::new(&data, limit);

        let html = Toolbar::with_defaults(&[ExportType::Csv]).render(&ctx).unwrap();
        assert!(html.contains("t_clear_=true"));
        assert!(html.contains("t_e_=csv"));
        assert!(html.contains(">Export csv</a>"));
    }

    #[test]
    fn page_size_choices() {
        let data = records(3);
        let ctx = CoreContext::new(&data, Limit::new("t"));
        let mut toolbar = Toolbar::new();
        toolbar.add(ToolbarItem::MaxRows(vec![15, 50]));
        let html = toolbar.render(&ctx).unwrap();
        assert!(html.contains("<span class=\"disabled\">15</span>"));
        assert!(html.contains("t_mr_=50"));
    }
}
