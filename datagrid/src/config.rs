//! Table configuration

use std::time::Duration;

use serde::Deserialize;

/// Row spacing preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Standard,
    Comfortable,
}

impl Density {
    /// Row height in pixels implied by the density.
    pub fn row_height(self) -> u32 {
        match self {
            Density::Compact => 36,
            Density::Standard => 48,
            Density::Comfortable => 60,
        }
    }
}

/// Options recognised by [`DataTable`](crate::DataTable).
///
/// Each option toggles or parameterizes one behaviour without changing the
/// engine's algorithms. Deserializes from camelCase JSON so a dashboard
/// config can be loaded directly.
///
/// # Example
///
/// ```
/// use datagrid::TableConfig;
///
/// let config = TableConfig::default()
///     .with_table_id("companies")
///     .with_persistent_filters(true)
///     .with_virtual_item_size(50)
///     .with_overscan(5);
/// assert_eq!(config.row_height(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// Render only the rows (and columns) near the viewport.
    ///
    /// Default: true
    pub enable_virtualization: bool,

    /// Row height in pixels. Falls back to the density's row height.
    pub virtual_item_size: Option<u32>,

    /// Rows/columns rendered beyond each edge of the viewport.
    ///
    /// Default: 5
    pub overscan: usize,

    /// Row count at or below which no windowing is done.
    ///
    /// Default: 100
    pub virtualization_threshold: usize,

    /// Window columns as well as rows, for wide tables.
    ///
    /// Default: false
    pub enable_column_virtualization: bool,

    /// Show rows one page at a time.
    ///
    /// Default: false
    pub enable_pagination: bool,

    /// Rows per page.
    ///
    /// Default: 50
    pub page_size: usize,

    /// Page sizes a user may pick.
    pub page_size_options: Vec<usize>,

    pub enable_column_filters: bool,
    pub enable_sorting: bool,
    pub enable_search: bool,

    /// Placeholder text of the search box.
    pub search_placeholder: String,

    /// Read the global-search haystack from this field instead of the row's
    /// derived searchable text.
    pub searchable_text_key: Option<String>,

    /// Persist filters, search and sorting per `table_id`.
    ///
    /// Default: false
    pub enable_persistent_filters: bool,

    /// Identifier scoping persisted state.
    pub table_id: Option<String>,

    pub density: Density,

    /// Debounce window of persisted-state writes, in milliseconds.
    ///
    /// Default: 400
    pub persist_debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enable_virtualization: true,
            virtual_item_size: None,
            overscan: 5,
            virtualization_threshold: 100,
            enable_column_virtualization: false,
            enable_pagination: false,
            page_size: 50,
            page_size_options: vec![25, 50, 100, 250],
            enable_column_filters: true,
            enable_sorting: true,
            enable_search: true,
            search_placeholder: "Search...".to_string(),
            searchable_text_key: None,
            enable_persistent_filters: false,
            table_id: None,
            density: Density::Standard,
            persist_debounce_ms: 400,
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective row height.
    pub fn row_height(&self) -> u32 {
        self.virtual_item_size.unwrap_or_else(|| self.density.row_height())
    }

    /// Debounce window of persisted-state writes.
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    /// Table id, if persistence is enabled and an id is set.
    pub fn persistence_id(&self) -> Option<&str> {
        self.table_id
            .as_deref()
            .filter(|_| self.enable_persistent_filters)
    }

    pub fn with_virtualization(mut self, enabled: bool) -> Self {
        self.enable_virtualization = enabled;
        self
    }

    pub fn with_virtual_item_size(mut self, size: u32) -> Self {
        self.virtual_item_size = Some(size);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_virtualization_threshold(mut self, threshold: usize) -> Self {
        self.virtualization_threshold = threshold;
        self
    }

    pub fn with_column_virtualization(mut self, enabled: bool) -> Self {
        self.enable_column_virtualization = enabled;
        self
    }

    pub fn with_pagination(mut self, page_size: usize) -> Self {
        self.enable_pagination = true;
        self.page_size = page_size;
        self
    }

    pub fn with_column_filters(mut self, enabled: bool) -> Self {
        self.enable_column_filters = enabled;
        self
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn with_search(mut self, enabled: bool) -> Self {
        self.enable_search = enabled;
        self
    }

    pub fn with_searchable_text_key(mut self, key: impl Into<String>) -> Self {
        self.searchable_text_key = Some(key.into());
        self
    }

    pub fn with_persistent_filters(mut self, enabled: bool) -> Self {
        self.enable_persistent_filters = enabled;
        self
    }

    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    pub fn with_persist_debounce(mut self, debounce: Duration) -> Self {
        self.persist_debounce_ms = debounce.as_millis() as u64;
        self
    }
}
