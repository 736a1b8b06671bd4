//! FILENAME: core/view/src/csv.rs
//! PURPOSE: Delimited text export - a title row, then one record per item.

use crate::error::ViewError;
use crate::export::{column_titles, rendered_rows, ExportView};
use crate::table::Table;
use engine::preferences::CSV_DELIMITER;
use engine::CoreContext;

#[derive(Debug, Clone, Default)]
pub struct CsvView {
    delimiter: Option<u8>,
}

impl CsvView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the delimiter instead of reading the `csv.delimiter` preference.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    fn delimiter(&self, ctx: &CoreContext<'_>) -> u8 {
        if let Some(delimiter) = self.delimiter {
            return delimiter;
        }
        match ctx.preference(CSV_DELIMITER) {
            Some("\\t") | Some("tab") => b'\t',
            Some(pref) if pref.len() == 1 => pref.as_bytes()[0],
            _ => b',',
        }
    }
}

impl ExportView for CsvView {
    fn content_type(&self) -> &str {
        "text/csv"
    }

    fn extension(&self) -> &str {
        "csv"
    }

    fn render(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<u8>, ViewError> {
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter(ctx))
            .from_writer(Vec::new());

        writer.write_record(column_titles(table))?;
        for row in rendered_rows(table, ctx)? {
            writer.write_record(row.iter().map(|value| value.to_string()))?;
        }

        writer.into_inner().map_err(|e| ViewError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Limit, Preferences, Record};

    fn data() -> Vec<Record> {
        vec![
            Record::new().with("name", "Washington, George").with("term", 2i64),
            Record::new().with("name", "Adams").with("term", Option::<i64>::None),
        ]
    }

    #[test]
    fn quotes_fields_that_contain_the_delimiter() {
        let data = data();
        let table = Table::with_columns(&["name", "term"]).unwrap();
        let ctx = CoreContext::new(&data, Limit::new("t"));

        let bytes = CsvView::new().render(&table, &ctx).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Name,Term\n\"Washington, George\",2\nAdams,\n");
    }

    #[test]
    fn delimiter_comes_from_preferences() {
        let data = data();
        let table = Table::with_columns(&["name", "term"]).unwrap();
        let mut prefs = Preferences::new();
        prefs.set(CSV_DELIMITER, ";");
        let ctx = CoreContext::new(&data, Limit::new("t")).with_preferences(prefs);

        let text = String::from_utf8(CsvView::new().render(&table, &ctx).unwrap()).unwrap();
        assert!(text.starts_with("Name;Term\nWashington, George;2\n"));

        let tabbed = CsvView::new().with_delimiter(b'\t').render(&table, &ctx).unwrap();
        assert!(String::from_utf8(tabbed).unwrap().starts_with("Name\tTerm\n"));
    }
}
