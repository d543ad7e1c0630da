//! Element reference data.
//!
//! Elements name the quantity an observation measures (sea surface
//! temperature, wave height, pH and so on). They are seeded by migration and
//! read-only at runtime.

use serde::{Deserialize, Serialize};

/// Integer primary key of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(i64);

impl ElementId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer primary key of an element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// Grouping of related elements, e.g. "Chemistry".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCategory {
    pub id: CategoryId,
    pub name: String,
}

/// A measurable quantity with its optional category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub category: Option<ElementCategory>,
}

impl Element {
    /// Category name, or `"Uncategorized"` when the element has none.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or("Uncategorized", |category| category.name.as_str())
    }
}
