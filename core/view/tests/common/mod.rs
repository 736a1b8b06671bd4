//! FILENAME: core/view/tests/common/mod.rs
//! Test harness and fixtures for view integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use engine::Record;
use std::collections::HashMap;
use view::{ExportResponse, RenderOutcome, TableFacade, ViewError};

pub const TABLE_ID: &str = "pres";

/// (first name, last name, term, career, born)
const PRESIDENTS: &[(&str, &str, &str, &str, (i32, u32, u32))] = &[
    ("George", "Washington", "1789-1797", "Soldier", (1732, 2, 22)),
    ("John", "Adams", "1797-1801", "Lawyer", (1735, 10, 30)),
    ("Thomas", "Jefferson", "1801-1809", "Lawyer", (1743, 4, 13)),
    ("James", "Madison", "1809-1817", "Lawyer", (1751, 3, 16)),
    ("James", "Monroe", "1817-1825", "Lawyer", (1758, 4, 28)),
    ("John Quincy", "Adams", "1825-1829", "Diplomat", (1767, 7, 11)),
    ("Andrew", "Jackson", "1829-1837", "Soldier", (1767, 3, 15)),
    ("Martin", "Van Buren", "1837-1841", "Lawyer", (1782, 12, 5)),
];

/// A president with the name as a nested record: `name.firstName`,
/// `name.lastName`, `term`, `career`, `born`.
pub fn president(first: &str, last: &str, term: &str, career: &str, born: NaiveDate) -> Record {
    Record::new()
        .with_child(
            "name",
            Record::new().with("firstName", first).with("lastName", last),
        )
        .with("term", term)
        .with("career", career)
        .with("born", born)
}

pub fn presidents() -> Vec<Record> {
    PRESIDENTS
        .iter()
        .filter_map(|(first, last, term, career, (y, m, d))| {
            NaiveDate::from_ymd_opt(*y, *m, *d).map(|born| president(first, last, term, career, born))
        })
        .collect()
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Owns the fixture data and request parameters a facade borrows.
pub struct TestHarness {
    pub items: Vec<Record>,
    pub params: HashMap<String, String>,
}

impl TestHarness {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        TestHarness {
            items: presidents(),
            params: params(pairs),
        }
    }

    /// A facade over the presidents with the usual four columns.
    pub fn facade(&self) -> TableFacade<'_> {
        let mut facade = TableFacade::new(TABLE_ID, &self.params);
        facade.set_items(&self.items).expect("items");
        facade
            .set_column_properties(&["name.firstName", "name.lastName", "term", "career"])
            .expect("columns");
        facade
    }

    /// Renders the interactive view and returns the markup.
    pub fn render_html(&self) -> Result<String, ViewError> {
        let mut facade = self.facade();
        let mut response = ExportResponse::new(Vec::new());
        match facade.render(&mut response)? {
            RenderOutcome::Html(html) => Ok(html),
            RenderOutcome::Exported => panic!("expected markup, got an export"),
        }
    }
}
