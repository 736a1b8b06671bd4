//! FILENAME: core/engine/src/limit/sort.rs
//! PURPOSE: Sort orders and the position-ordered SortSet.

use serde::{Deserialize, Serialize};

// ============================================================================
// ORDER
// ============================================================================

/// Direction of a sort key. `None` leaves the key out of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    None,
    Asc,
    Desc,
}

impl Order {
    /// Default cycle a column header walks through on successive clicks.
    pub const CYCLE: [Order; 3] = [Order::None, Order::Asc, Order::Desc];

    pub fn to_param(self) -> &'static str {
        match self {
            Order::None => "none",
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }

    pub fn from_param(param: &str) -> Option<Order> {
        match param.trim().to_lowercase().as_str() {
            "none" => Some(Order::None),
            "asc" => Some(Order::Asc),
            "desc" => Some(Order::Desc),
            _ => None,
        }
    }

    /// The order that follows this one in `cycle`. Orders missing from the
    /// cycle restart it.
    pub fn next_in(self, cycle: &[Order]) -> Order {
        if cycle.is_empty() {
            return self;
        }
        match cycle.iter().position(|o| *o == self) {
            Some(i) => cycle[(i + 1) % cycle.len()],
            None => cycle[0],
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::None
    }
}

// ============================================================================
// SORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Position in the key precedence; lowest sorts first.
    pub position: u32,
    pub property: String,
    pub order: Order,
}

impl Sort {
    pub fn new(position: u32, property: impl Into<String>, order: Order) -> Self {
        Sort {
            position,
            property: property.into(),
            order,
        }
    }
}

// ============================================================================
// SORT SET
// ============================================================================

/// Sorts unique by property, kept ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSet {
    sorts: Vec<Sort>,
}

impl SortSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sort. A sort for a property that is already present replaces
    /// its order and keeps the existing position.
    pub fn add_sort(&mut self, sort: Sort) {
        if let Some(existing) = self.sorts.iter_mut().find(|s| s.property == sort.property) {
            existing.order = sort.order;
            return;
        }
        self.sorts.push(sort);
        // stable: equal positions keep insertion order
        self.sorts.sort_by_key(|s| s.position);
    }

    pub fn remove_sort(&mut self, property: &str) -> Option<Sort> {
        let index = self.sorts.iter().position(|s| s.property == property)?;
        Some(self.sorts.remove(index))
    }

    pub fn get_sort(&self, property: &str) -> Option<&Sort> {
        self.sorts.iter().find(|s| s.property == property)
    }

    /// Current order for a property, `Order::None` when unsorted.
    pub fn order_of(&self, property: &str) -> Order {
        self.get_sort(property).map(|s| s.order).unwrap_or(Order::None)
    }

    /// All sorts ordered by position.
    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Sorts that take part in the comparison, ordered by position.
    pub fn active_sorts(&self) -> impl Iterator<Item = &Sort> {
        self.sorts.iter().filter(|s| s.order != Order::None)
    }

    pub fn is_sorted(&self) -> bool {
        self.active_sorts().next().is_some()
    }

    pub fn clear(&mut self) {
        self.sorts.clear();
    }
}
