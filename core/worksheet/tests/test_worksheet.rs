//! FILENAME: core/worksheet/tests/test_worksheet.rs
//! PURPOSE: Worksheet edits submitted through request parameters, with the
//! table and context built by the facade.

mod common;

use common::{params, presidents, TABLE_ID};
use engine::{get_value, Value};
use view::{TableFacade, Validation};
use worksheet::{Worksheet, WorksheetError, WorksheetParams};

fn facade<'a>(
    items: &'a Vec<engine::Record>,
    request: &'a std::collections::HashMap<String, String>,
) -> TableFacade<'a> {
    let mut facade = TableFacade::new(TABLE_ID, request);
    facade.set_items(items).unwrap();
    facade
        .set_column_properties(&["id", "name.lastName", "terms", "career"])
        .unwrap();
    let table = facade.table_mut().unwrap();
    table.row_mut().set_unique_properties(&["id"]);
    table
        .row_mut()
        .column_mut("career")
        .unwrap()
        .add_validation(Validation::required());
    facade
}

#[test]
fn test_rejected_edit_does_not_stop_other_cells() {
    let data = presidents();
    let keys = WorksheetParams::new(TABLE_ID);
    let request = params(&[
        (keys.cell_key("2", "terms").as_str(), "two"),
        (keys.cell_key("2", "name.lastName").as_str(), "Quincy Adams"),
        (keys.cell_key("3", "career").as_str(), ""),
        (keys.cell_key("4", "terms").as_str(), "3"),
    ]);
    let mut facade = facade(&data, &request);
    let (table, ctx) = facade.parts().unwrap();

    let sheet = Worksheet::process(table, ctx, &request).unwrap();

    assert!(sheet.has_errors());
    assert_eq!(sheet.error_count(), 2);

    let terms = sheet.row("2").unwrap().column("terms").unwrap();
    assert!(terms.has_error());
    assert!(terms.changed_value().is_none());
    assert_eq!(terms.error(), Some("'two' is not a valid whole number"));

    let career = sheet.row("3").unwrap().column("career").unwrap();
    assert_eq!(career.error(), Some("A value is required"));

    let changed = sheet.changed_values();
    assert_eq!(
        changed,
        vec![
            ("2", "name.lastName", &Value::text("Quincy Adams")),
            ("4", "terms", &Value::Int(3)),
        ]
    );

    // the items are untouched
    assert_eq!(get_value(&data[1], "name.lastName").unwrap(), Value::text("Adams"));
    assert_eq!(get_value(&data[3], "terms").unwrap(), Value::Int(2));
}

#[test]
fn test_same_edit_twice_gives_the_same_result() {
    let data = presidents();
    let keys = WorksheetParams::new(TABLE_ID);
    let request = params(&[(keys.cell_key("1", "terms").as_str(), "4")]);
    let mut facade = facade(&data, &request);
    let (table, ctx) = facade.parts().unwrap();

    let first = Worksheet::process(table, ctx, &request).unwrap();
    let second = Worksheet::process(table, ctx, &request).unwrap();

    assert_eq!(first, second);
    let cell = second.row("1").unwrap().column("terms").unwrap();
    assert_eq!(cell.original_value(), &Value::Int(2));
    assert_eq!(cell.changed_value(), Some(&Value::Int(4)));
    assert!(!second.has_errors());
}

#[test]
fn test_edits_require_unique_properties() {
    let data = presidents();
    let request = params(&[("pres_ws_[1]_terms", "4")]);
    let mut facade = TableFacade::new(TABLE_ID, &request);
    facade.set_items(&data).unwrap();
    facade.set_column_properties(&["id", "terms"]).unwrap();
    let (table, ctx) = facade.parts().unwrap();

    let err = Worksheet::process(table, ctx, &request).unwrap_err();
    assert!(matches!(err, WorksheetError::MissingUniqueProperties));
}
