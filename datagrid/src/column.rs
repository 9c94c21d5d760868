//! Column descriptors.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::row::{PLACEHOLDER, Row};
use crate::value::Value;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;

/// Visual emphasis of a rendered cell (badge colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Present when the cell renders as a badge.
    pub tone: Option<Tone>,
}

impl Cell {
    /// A plain text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    /// A badge cell.
    pub fn badge(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
        }
    }
}

/// How a column can be filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVariant {
    /// Case-insensitive substring match.
    Text,
    /// One value picked from the distinct values of the column.
    Select,
    /// Any of several values picked from the distinct values of the column.
    MultiSelect,
}

/// Renders a field value into a cell.
pub type Renderer = Arc<dyn Fn(&Value) -> Cell + Send + Sync>;

/// Orders two non-null field values.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Static column configuration.
///
/// # Examples
///
/// ```
/// use datagrid::{ColumnDescriptor, FilterVariant};
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Company", 220).sortable(),
///     ColumnDescriptor::new("employees", "Employees", 120)
///         .sortable()
///         .sort_by("employees_raw"),
///     ColumnDescriptor::new("status", "Status", 120).filter(FilterVariant::MultiSelect),
/// ];
/// assert_eq!(columns[1].sort_field(), "employees_raw");
/// ```
#[derive(Clone)]
pub struct ColumnDescriptor {
    /// Field key displayed by this column.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Width in pixels, used by column virtualization.
    pub width: u32,
    /// Whether clicking the header sorts.
    pub sortable: bool,
    /// Filter variant, if the column can be filtered.
    pub filter: Option<FilterVariant>,
    sort_key: Option<String>,
    comparator: Option<Comparator>,
    renderer: Option<Renderer>,
}

impl ColumnDescriptor {
    /// Create a column with explicit width.
    pub fn new(key: impl Into<String>, label: impl Into<String>, width: u32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width,
            sortable: false,
            filter: None,
            sort_key: None,
            comparator: None,
            renderer: None,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sort by another field (typically the `*_raw` numeric twin of a
    /// formatted display field).
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_key = Some(field.into());
        self
    }

    /// Override the default type-aware ordering.
    pub fn compare_with<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Enable filtering with the given variant.
    pub fn filter(mut self, variant: FilterVariant) -> Self {
        self.filter = Some(variant);
        self
    }

    /// Set the cell renderer.
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Value) -> Cell + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Field used for sorting.
    pub fn sort_field(&self) -> &str {
        self.sort_key.as_deref().unwrap_or(&self.key)
    }

    /// Custom comparator, if declared.
    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Render this column's cell for a row.
    pub fn render(&self, row: &Row) -> Cell {
        let value = row.value(&self.key);
        match &self.renderer {
            Some(render) => render(value),
            None if value.is_null() => Cell::text(PLACEHOLDER),
            None => Cell::text(value.display()),
        }
    }

    /// Sorted distinct display values of this column, for select filters.
    ///
    /// List-valued fields contribute each element. Nulls, empty strings and
    /// placeholders are not options.
    pub fn select_options(&self, rows: &[Row]) -> Vec<String> {
        let mut options = BTreeSet::new();
        for row in rows {
            match row.value(&self.key) {
                Value::Null => {}
                Value::List(items) => options.extend(items.iter().cloned()),
                value => {
                    options.insert(value.display());
                }
            }
        }
        options.remove("");
        options.remove(PLACEHOLDER);
        options.into_iter().collect()
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("filter", &self.filter)
            .field("sort_key", &self.sort_key)
            .field("comparator", &self.comparator.is_some())
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Find a column by key.
pub fn find<'a>(columns: &'a [ColumnDescriptor], key: &str) -> Option<&'a ColumnDescriptor> {
    columns.iter().find(|c| c.key == key)
}
