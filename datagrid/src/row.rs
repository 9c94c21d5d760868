//! Display rows

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::value::Value;

/// Placeholder shown for missing text and date fields.
pub const PLACEHOLDER: &str = "—";

/// Placeholder shown for a missing status.
pub const UNKNOWN: &str = "Unknown";

/// Unique, fetch-stable row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Num(i64),
    Str(String),
}

impl RowId {
    /// Id of a record that came without one. [`transform_all`] replaces it
    /// with the record's position.
    ///
    /// [`transform_all`]: crate::transform_all
    pub const MISSING: RowId = RowId::Str(String::new());

    /// Returns `true` for [`RowId::MISSING`].
    pub fn is_missing(&self) -> bool {
        matches!(self, RowId::Str(s) if s.is_empty())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Num(n) => write!(f, "{n}"),
            RowId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(v: i64) -> Self {
        RowId::Num(v)
    }
}

impl From<i32> for RowId {
    fn from(v: i32) -> Self {
        RowId::Num(v as i64)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        RowId::Str(v.to_string())
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        RowId::Str(v)
    }
}

/// One transformed, display-ready record.
///
/// Rows are immutable once built. The searchable text is derived from the
/// same list of fields that was declared searchable on the [`RowBuilder`],
/// so the global search haystack cannot drift from the displayed data.
/// Changing a field goes through [`Row::with_field`], which regenerates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    fields: HashMap<String, Value>,
    /// Searchable field keys in declaration order.
    search_keys: Vec<String>,
    /// Search-only terms: raw source strings and static keyword tags.
    search_terms: Vec<String>,
    searchable_text: Option<String>,
}

impl Row {
    /// Starts building a row with the given id.
    pub fn builder(id: impl Into<RowId>) -> RowBuilder {
        RowBuilder::new(id)
    }

    /// Creates a row from bare fields, without searchable text.
    ///
    /// Global search on such a row falls back to matching every field value.
    pub fn from_fields(id: impl Into<RowId>, fields: HashMap<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
            search_keys: Vec::new(),
            search_terms: Vec::new(),
            searchable_text: None,
        }
    }

    /// Returns the row id.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: RowId) {
        self.id = id;
    }

    /// Returns a field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns a field value, treating absence as `Null`.
    pub fn value(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the precomputed lowercase searchable text, if any.
    pub fn searchable_text(&self) -> Option<&str> {
        self.searchable_text.as_deref()
    }

    /// Returns a copy of this row with one field replaced.
    ///
    /// Searchable text is regenerated from scratch.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut row = self.clone();
        row.fields.insert(key.into(), value.into());
        if row.searchable_text.is_some() {
            row.searchable_text = Some(row.build_searchable_text());
        }
        row
    }

    fn build_searchable_text(&self) -> String {
        let fields = self
            .search_keys
            .iter()
            .filter_map(|key| self.fields.get(key))
            .map(Value::display);
        fields
            .chain(self.search_terms.iter().cloned())
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty() && part != PLACEHOLDER)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for [`Row`].
///
/// # Example
///
/// ```
/// use datagrid::Row;
///
/// let row = Row::builder(1)
///     .field("name", "Acme Corp")
///     .hidden("employees_raw", 1200i64)
///     .field("employees", "1,200")
///     .tag("company")
///     .build();
///
/// assert_eq!(row.searchable_text(), Some("acme corp 1,200 company"));
/// ```
#[derive(Debug, Clone)]
pub struct RowBuilder {
    id: RowId,
    fields: HashMap<String, Value>,
    search_keys: Vec<String>,
    search_terms: Vec<String>,
}

impl RowBuilder {
    /// Creates an empty builder.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
            search_keys: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    /// Adds a displayed, searchable field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !self.search_keys.contains(&key) {
            self.search_keys.push(key.clone());
        }
        self.fields.insert(key, value.into());
        self
    }

    /// Adds a field that is not part of the searchable text (raw sort keys,
    /// internal ids).
    pub fn hidden(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        self.search_keys.retain(|k| k != &key);
        self.fields.insert(key, value.into());
        self
    }

    /// Adds a raw source string to the searchable text without storing it as
    /// a field. Missing values are skipped.
    pub fn source<S: AsRef<str>>(mut self, raw: Option<S>) -> Self {
        if let Some(raw) = raw {
            self.search_terms.push(raw.as_ref().to_string());
        }
        self
    }

    /// Adds a static keyword tag to the searchable text.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.search_terms.push(tag.into());
        self
    }

    /// Builds the row and derives its searchable text.
    pub fn build(self) -> Row {
        let mut row = Row {
            id: self.id,
            fields: self.fields,
            search_keys: self.search_keys,
            search_terms: self.search_terms,
            searchable_text: None,
        };
        row.searchable_text = Some(row.build_searchable_text());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text_is_lowercase_and_skips_empty_parts() {
        let row = Row::builder("c-1")
            .field("name", "ACME Corp")
            .field("industry", "")
            .field("city", Value::Null)
            .field("created", PLACEHOLDER)
            .source(Some("acme.example"))
            .source(None::<&str>)
            .tag("Company")
            .build();

        assert_eq!(row.searchable_text(), Some("acme corp acme.example company"));
    }

    #[test]
    fn test_with_field_regenerates_searchable_text() {
        let row = Row::builder(7).field("status", "Pending").build();
        let updated = row.with_field("status", "Completed");

        assert_eq!(updated.searchable_text(), Some("completed"));
        assert_eq!(row.searchable_text(), Some("pending"));
    }

    #[test]
    fn test_hidden_fields_are_not_searchable() {
        let row = Row::builder(1)
            .field("employees", "1,200")
            .hidden("employees_raw", 1200i64)
            .build();

        assert_eq!(row.searchable_text(), Some("1,200"));
        assert_eq!(row.value("employees_raw"), &Value::Int(1200));
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let row = Row::from_fields(1, HashMap::new());
        assert!(row.value("anything").is_null());
        assert_eq!(row.searchable_text(), None);
    }

    #[test]
    fn test_row_id_display() {
        assert_eq!(RowId::from(42).to_string(), "42");
        assert_eq!(RowId::from("abc").to_string(), "abc");
    }
}
