//! FILENAME: core/view/src/html/snippets.rs
//! PURPOSE: The independently retrievable pieces of the interactive table.
//! CONTEXT: HtmlView strings these together; templates can call them one by
//! one to lay the table out differently.

use super::builder::{escape_script, HtmlBuilder};
use super::toolbar::Toolbar;
use crate::error::ViewError;
use crate::table::Table;
use engine::messages::{STATUSBAR_NO_RESULTS_FOUND, STATUSBAR_RESULTS_FOUND};
use engine::preferences::{
    EVEN_CLASS, FILTER_CLASS, HEADER_CLASS, HIGHLIGHTER, HIGHLIGHT_CLASS, ODD_CLASS,
    ROWCOUNT_INCLUDE_PAGINATION, STATUS_CLASS, TABLE_CLASS, TBODY_CLASS, THEME, TOOLBAR_CLASS,
};
use engine::CoreContext;

pub struct HtmlSnippets<'v, 'a> {
    table: &'v Table,
    toolbar: &'v Toolbar,
    ctx: &'v CoreContext<'a>,
}

impl<'v, 'a> HtmlSnippets<'v, 'a> {
    pub fn new(table: &'v Table, toolbar: &'v Toolbar, ctx: &'v CoreContext<'a>) -> Self {
        HtmlSnippets { table, toolbar, ctx }
    }

    fn column_count(&self) -> String {
        self.table.row().columns().len().to_string()
    }

    pub fn theme_start(&self) -> String {
        let theme = self.table.theme().or_else(|| self.ctx.preference(THEME));
        let mut html = HtmlBuilder::new();
        html.open_inline("div").style_class(theme).close();
        html.build()
    }

    pub fn theme_end(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.newline().end_inline("div");
        html.build()
    }

    pub fn table_start(&self) -> String {
        let class = self.table.style_class().or_else(|| self.ctx.preference(TABLE_CLASS));
        let width = self.table.width().map(|w| format!("width:{}", w));

        let mut html = HtmlBuilder::new();
        html.open("table", 0)
            .attr("id", self.ctx.limit().id())
            .style_class(class)
            .attr_opt("style", width.as_deref())
            .close();
        if let Some(caption) = self.table.caption() {
            html.open("caption", 1).close().text(caption).end_inline("caption");
        }
        html.build()
    }

    pub fn table_end(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.end("table", 0);
        html.build()
    }

    pub fn thead_start(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.open("thead", 1).close();
        html.build()
    }

    pub fn thead_end(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.end("thead", 1);
        html.build()
    }

    pub fn tbody_start(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.open("tbody", 1)
            .style_class(self.ctx.preference(TBODY_CLASS))
            .close();
        html.build()
    }

    pub fn tbody_end(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.end("tbody", 1);
        html.build()
    }

    pub fn tfoot_start(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.open("tfoot", 1).close();
        html.build()
    }

    pub fn tfoot_end(&self) -> String {
        let mut html = HtmlBuilder::new();
        html.end("tfoot", 1);
        html.build()
    }

    /// Filter row; columns that are not filterable get an empty cell.
    pub fn filter(&self) -> String {
        let row = self.table.row();
        let mut html = HtmlBuilder::new();
        html.tr(1).style_class(self.ctx.preference(FILTER_CLASS)).close();
        for column in row.columns() {
            if column.is_filterable(row) {
                html.append(&column.filter_renderer().render(column, self.ctx));
            } else {
                html.td(2).close().td_end();
            }
        }
        html.tr_end(1);
        html.build()
    }

    pub fn header(&self) -> String {
        let row = self.table.row();
        let mut html = HtmlBuilder::new();
        html.tr(1).style_class(self.ctx.preference(HEADER_CLASS)).close();
        for column in row.columns() {
            let sortable = column.is_sortable(row);
            html.append(&column.header_renderer().render(column, sortable, self.ctx));
        }
        html.tr_end(1);
        html.build()
    }

    /// One row per page item. Row counts start at 1, or after the rows of
    /// the previous pages when `html.rowcountIncludePagination` is set.
    pub fn body(&self) -> Result<String, ViewError> {
        let row = self.table.row();
        let odd_class = self.ctx.preference(ODD_CLASS);
        let even_class = self.ctx.preference(EVEN_CLASS);
        let highlighter = row
            .highlighter()
            .unwrap_or_else(|| self.ctx.preferences().get_bool(HIGHLIGHTER));
        let highlight_class = self.ctx.preference(HIGHLIGHT_CLASS).unwrap_or("");

        let mut rowcount = if self.ctx.preferences().get_bool(ROWCOUNT_INCLUDE_PAGINATION) {
            self.ctx.row_select()?.row_start()
        } else {
            0
        };

        let mut html = HtmlBuilder::new();
        for item in self.ctx.page_items()? {
            rowcount += 1;
            let class = if rowcount % 2 == 1 { odd_class } else { even_class };

            html.tr(1).style_class(class);
            if highlighter {
                html.attr("onmouseover", &format!("this.className='{}'", highlight_class))
                    .attr("onmouseout", &format!("this.className='{}'", class.unwrap_or("")));
            }
            html.close();

            for column in row.columns() {
                let value = column.cell_renderer().render(item, column.property(), rowcount)?;
                html.td(2).style_class(column.style_class()).close();
                html.text(&value.to_string()).td_end();
            }
            html.tr_end(1);
        }
        Ok(html.build())
    }

    /// "Results 1 - 15 of 42" or the no-results message.
    pub fn status_bar_text(&self) -> Result<String, ViewError> {
        let row_select = self.ctx.row_select()?;
        if row_select.total_rows() == 0 {
            return Ok(self.ctx.message(STATUSBAR_NO_RESULTS_FOUND, &[]));
        }
        let total = row_select.total_rows().to_string();
        let from = (row_select.row_start() + 1).to_string();
        let to = row_select.row_end().to_string();
        Ok(self.ctx.message(STATUSBAR_RESULTS_FOUND, &[&total, &from, &to]))
    }

    pub fn toolbar(&self) -> Result<String, ViewError> {
        let mut html = HtmlBuilder::new();
        html.tr(1).style_class(self.ctx.preference(TOOLBAR_CLASS)).close();
        html.td(2).attr("colspan", &self.column_count()).close();
        html.append(&self.toolbar.render(self.ctx)?);
        html.td_end();
        html.tr_end(1);
        Ok(html.build())
    }

    pub fn status_bar(&self) -> Result<String, ViewError> {
        let mut html = HtmlBuilder::new();
        html.tr(1).style_class(self.ctx.preference(STATUS_CLASS)).close();
        html.td(2)
            .attr("align", "left")
            .attr("colspan", &self.column_count())
            .close();
        html.text(&self.status_bar_text()?);
        html.td_end();
        html.tr_end(1);
        Ok(html.build())
    }

    /// Script block handing the resolved Limit to client code as JSON.
    pub fn init_javascript_limit(&self) -> Result<String, ViewError> {
        let limit = self.ctx.resolved_limit()?;
        let json = serde_json::to_string(&limit)?.replace("</", "<\\/");
        let mut html = HtmlBuilder::new();
        html.newline();
        html.open_inline("script").attr("type", "text/javascript").close();
        html.newline();
        html.append(&format!("registerLimit('{}', {});", escape_script(limit.id()), json));
        html.newline();
        html.end_inline("script");
        Ok(html.build())
    }
}
