//! FILENAME: core/engine/src/property.rs
//! PURPOSE: Reads and writes possibly nested named properties on arbitrary items.
//! CONTEXT: This is the single seam every filter, sort, renderer and editor
//! goes through. Items expose their properties by implementing `Item`;
//! dotted paths such as `name.firstName` walk `Item::child` for every segment
//! except the last.

use crate::error::PropertyError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// ITEM
// ============================================================================

/// A domain object whose properties can be read by name.
pub trait Item {
    /// Reads a single (undotted) property. `None` means the item has no such
    /// property; a present but empty property is `Some(Value::Null)`.
    fn property(&self, name: &str) -> Option<Value>;

    /// Returns the nested item behind a path segment.
    fn child(&self, _name: &str) -> Option<&dyn Item> {
        None
    }

    /// Writes a single (undotted) property.
    fn set_property(&mut self, name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::NotWritable(name.to_string()))
    }

    /// Returns the mutable nested item behind a path segment.
    fn child_mut(&mut self, _name: &str) -> Option<&mut dyn Item> {
        None
    }
}

/// An ordered collection of items, borrowed by the resolution engine.
pub trait Items {
    fn len(&self) -> usize;

    fn item(&self, index: usize) -> Option<&dyn Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Item> Items for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn item(&self, index: usize) -> Option<&dyn Item> {
        self.get(index).map(|item| item as &dyn Item)
    }
}

impl<T: Item> Items for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, index: usize) -> Option<&dyn Item> {
        self.get(index).map(|item| item as &dyn Item)
    }
}

// ============================================================================
// PROPERTY PATH
// ============================================================================

/// A parsed, dotted property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, PropertyError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(PropertyError::EmptyPath(path.to_string()));
        }
        Ok(PropertyPath {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, which names the property on the innermost item.
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// ACCESSOR
// ============================================================================

/// Resolves a parsed path against an item.
pub fn resolve(item: &dyn Item, path: &PropertyPath) -> Result<Value, PropertyError> {
    let mut current = item;
    for segment in path.parents() {
        current = current
            .child(segment)
            .ok_or_else(|| PropertyError::NotFound(path.to_string()))?;
    }
    current
        .property(path.leaf())
        .ok_or_else(|| PropertyError::NotFound(path.to_string()))
}

/// Reads a dotted property off an item.
pub fn get_value(item: &dyn Item, path: &str) -> Result<Value, PropertyError> {
    resolve(item, &PropertyPath::parse(path)?)
}

/// Writes a dotted property on an item.
pub fn set_value(item: &mut dyn Item, path: &str, value: Value) -> Result<(), PropertyError> {
    let parsed = PropertyPath::parse(path)?;
    let mut current = item;
    for segment in parsed.parents() {
        current = current
            .child_mut(segment)
            .ok_or_else(|| PropertyError::NotFound(parsed.to_string()))?;
    }
    current.set_property(parsed.leaf(), value)
}

// ============================================================================
// BUILT-IN ITEMS
// ============================================================================

/// A schemaless item: named values plus named nested records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    values: BTreeMap<String, Value>,
    #[serde(default)]
    children: BTreeMap<String, Record>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, name: &str, child: Record) -> Self {
        self.children.insert(name.to_string(), child);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }
}

impl Item for Record {
    fn property(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn child(&self, name: &str) -> Option<&dyn Item> {
        self.children.get(name).map(|c| c as &dyn Item)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Item> {
        self.children.get_mut(name).map(|c| c as &mut dyn Item)
    }
}

/// JSON objects are items; nested objects are children.
impl Item for serde_json::Value {
    fn property(&self, name: &str) -> Option<Value> {
        self.as_object()?.get(name).map(Value::from_json)
    }

    fn child(&self, name: &str) -> Option<&dyn Item> {
        self.as_object()?
            .get(name)
            .filter(|v| v.is_object())
            .map(|v| v as &dyn Item)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match self.as_object_mut() {
            Some(map) => {
                map.insert(name.to_string(), value.to_json());
                Ok(())
            }
            None => Err(PropertyError::NotWritable(name.to_string())),
        }
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Item> {
        self.as_object_mut()?
            .get_mut(name)
            .filter(|v| v.is_object())
            .map(|v| v as &mut dyn Item)
    }
}
