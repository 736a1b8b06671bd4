//! FILENAME: core/view/src/html/builder.rs
//! PURPOSE: Small chained markup writer used by every HTML fragment.
//! CONTEXT: Block elements start on a new line indented by tabs; inline
//! content is appended as-is. Attribute values and text go through
//! `escape`, raw fragments through `append`.

use engine::Limit;

pub struct HtmlBuilder {
    buf: String,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlBuilder {
    pub fn new() -> Self {
        HtmlBuilder { buf: String::new() }
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn tabs(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.buf.push('\t');
        }
        self
    }

    /// Starts `<tag` on a new indented line. Finish with `close`.
    pub fn open(&mut self, tag: &str, indent: usize) -> &mut Self {
        self.newline().tabs(indent);
        self.buf.push('<');
        self.buf.push_str(tag);
        self
    }

    /// Starts `<tag` inline.
    pub fn open_inline(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self
    }

    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(&escape(value));
        self.buf.push('"');
        self
    }

    /// Writes the attribute only when there is a non-empty value.
    pub fn attr_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.attr(name, v),
            _ => self,
        }
    }

    pub fn style_class(&mut self, class: Option<&str>) -> &mut Self {
        self.attr_opt("class", class)
    }

    pub fn close(&mut self) -> &mut Self {
        self.buf.push('>');
        self
    }

    pub fn self_close(&mut self) -> &mut Self {
        self.buf.push_str("/>");
        self
    }

    /// `</tag>` on a new indented line.
    pub fn end(&mut self, tag: &str, indent: usize) -> &mut Self {
        self.newline().tabs(indent);
        self.end_inline(tag)
    }

    pub fn end_inline(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Escaped text content.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape(text));
        self
    }

    /// Raw markup.
    pub fn append(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    pub fn tr(&mut self, indent: usize) -> &mut Self {
        self.open("tr", indent)
    }

    pub fn tr_end(&mut self, indent: usize) -> &mut Self {
        self.end("tr", indent)
    }

    pub fn td(&mut self, indent: usize) -> &mut Self {
        self.open("td", indent)
    }

    pub fn td_end(&mut self) -> &mut Self {
        self.end_inline("td")
    }

    pub fn build(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Escapes the five markup-significant characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escapes a value for a single-quoted script string.
pub fn escape_script(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'").replace('<', "\\x3C")
}

/// `?key=value&...` for the Limit's parameters, URL encoded.
pub fn limit_query(limit: &Limit) -> String {
    let pairs: Vec<String> = limit
        .to_params()
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Filter;

    #[test]
    fn builds_indented_rows() {
        let mut html = HtmlBuilder::new();
        html.tr(1).style_class(Some("odd")).close();
        html.td(2).close().text("a < b").td_end();
        html.tr_end(1);
        assert_eq!(
            html.build(),
            "\n\t<tr class=\"odd\">\n\t\t<td>a &lt; b</td>\n\t</tr>"
        );
    }

    #[test]
    fn empty_classes_are_skipped() {
        let mut html = HtmlBuilder::new();
        html.open_inline("td").style_class(Some("")).close();
        assert_eq!(html.as_str(), "<td>");
    }

    #[test]
    fn query_is_url_encoded() {
        let mut limit = Limit::new("pres");
        limit.add_filter(Filter::new("career", "Soldier & Lawyer"));
        let query = limit_query(&limit);
        assert!(query.starts_with("?pres_p_=1&pres_mr_=15"));
        assert!(query.contains("pres_f_career=Soldier%20%26%20Lawyer"));
    }
}
