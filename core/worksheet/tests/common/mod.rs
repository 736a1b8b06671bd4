//! FILENAME: core/worksheet/tests/common/mod.rs
//! Fixtures for worksheet integration tests.

#![allow(dead_code)]

use engine::Record;
use std::collections::HashMap;

pub const TABLE_ID: &str = "pres";

/// Presidents keyed by `id`, with a numeric `term` count and a nested name.
pub fn presidents() -> Vec<Record> {
    [
        (1i64, "George", "Washington", 2i64, "Soldier"),
        (2, "John", "Adams", 1, "Lawyer"),
        (3, "Thomas", "Jefferson", 2, "Lawyer"),
        (4, "James", "Madison", 2, "Lawyer"),
    ]
    .iter()
    .map(|(id, first, last, terms, career)| {
        Record::new()
            .with("id", *id)
            .with_child(
                "name",
                Record::new().with("firstName", *first).with("lastName", *last),
            )
            .with("terms", *terms)
            .with("career", *career)
    })
    .collect()
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
