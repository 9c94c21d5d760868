//! Global search and column filter clauses.

use serde::Deserialize;
use serde::Serialize;

use crate::column::FilterVariant;
use crate::row::Row;
use crate::value::Value;

/// Value of a column filter clause. The variant decides how it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Equality after boolean coercion.
    Bool(bool),
    /// Equality after numeric coercion.
    Number(f64),
    /// Case-insensitive substring, or exact match on select columns.
    Text(String),
    /// Membership.
    List(Vec<String>),
}

impl FilterValue {
    /// Returns `true` if the value is empty and the clause must not exclude
    /// anything.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Bool(_) | FilterValue::Number(_) => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::List(v)
    }
}

/// One per-column constraint. `value: None` is the same as no clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column key (or field name) the clause applies to.
    pub id: String,
    #[serde(default)]
    pub value: Option<FilterValue>,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }

    /// Returns the clause value if it can exclude rows.
    pub fn active_value(&self) -> Option<&FilterValue> {
        self.value.as_ref().filter(|v| !v.is_empty())
    }

    /// Evaluate this clause against a row.
    ///
    /// Inactive clauses pass every row. A null field fails any active
    /// clause.
    pub fn matches(&self, row: &Row, field: &str, variant: Option<FilterVariant>) -> bool {
        let Some(value) = self.active_value() else {
            return true;
        };
        let cell = row.value(field);
        if cell.is_null() {
            return false;
        }
        match value {
            FilterValue::List(options) => match cell {
                Value::List(items) => items.iter().any(|item| options.contains(item)),
                other => options.contains(&other.display()),
            },
            FilterValue::Text(text) if variant == Some(FilterVariant::Select) => {
                cell.display() == *text
            }
            FilterValue::Text(text) => cell
                .display()
                .to_lowercase()
                .contains(&text.trim().to_lowercase()),
            FilterValue::Number(n) => cell.as_f64().is_some_and(|v| v == *n),
            FilterValue::Bool(b) => cell.as_bool() == Some(*b),
        }
    }
}

/// Normalizes a global search term: trimmed and lowercased, `None` when
/// empty.
pub fn normalize_search(term: &str) -> Option<String> {
    let term = term.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

/// Substring match of a normalized term against a row.
///
/// Uses `haystack` when given, otherwise the lowercased display form of
/// every field of the row.
pub fn matches_global(row: &Row, haystack: Option<&str>, term: &str) -> bool {
    match haystack {
        Some(text) => text.contains(term),
        None => row
            .fields()
            .values()
            .any(|value| value.display().to_lowercase().contains(term)),
    }
}
