//! FILENAME: core/view/src/html/view.rs

use super::snippets::HtmlSnippets;
use super::toolbar::Toolbar;
use crate::error::ViewError;
use crate::table::Table;
use engine::CoreContext;

/// The whole interactive table: theme, head (filter and header rows), body,
/// toolbar and status bar, then the Limit script.
pub struct HtmlView<'v, 'a> {
    snippets: HtmlSnippets<'v, 'a>,
}

impl<'v, 'a> HtmlView<'v, 'a> {
    pub fn new(table: &'v Table, toolbar: &'v Toolbar, ctx: &'v CoreContext<'a>) -> Self {
        HtmlView {
            snippets: HtmlSnippets::new(table, toolbar, ctx),
        }
    }

    pub fn snippets(&self) -> &HtmlSnippets<'v, 'a> {
        &self.snippets
    }

    pub fn render(&self) -> Result<String, ViewError> {
        let s = &self.snippets;
        let mut html = String::new();

        html.push_str(&s.theme_start());
        html.push_str(&s.table_start());

        html.push_str(&s.thead_start());
        html.push_str(&s.filter());
        html.push_str(&s.header());
        html.push_str(&s.thead_end());

        html.push_str(&s.tbody_start());
        html.push_str(&s.body()?);
        html.push_str(&s.tbody_end());

        html.push_str(&s.tfoot_start());
        html.push_str(&s.toolbar()?);
        html.push_str(&s.status_bar()?);
        html.push_str(&s.tfoot_end());

        html.push_str(&s.table_end());
        html.push_str(&s.theme_end());
        html.push_str(&s.init_javascript_limit()?);
        Ok(html)
    }
}
