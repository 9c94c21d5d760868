//! Table façade.
//!
//! [`DataTable`] owns the full row array and the current filter/sort/search
//! state for its lifetime, wires the engine, pagination, windowing and
//! persisted view state together, and reports what to draw through
//! [`TableView`].

use log::{debug, info, warn};

use crate::column::{self, Cell, ColumnDescriptor};
use crate::config::TableConfig;
use crate::engine::{self, Haystack, Query, ViewState};
use crate::error::LoadError;
use crate::filter::{ColumnFilter, FilterValue};
use crate::paginate::{self, PageSlice, Pagination};
use crate::persist::{Debouncer, ViewStateStore};
use crate::row::Row;
use crate::sort::SortState;
use crate::source::DataSource;
use crate::transform::{self, RowTransformer};
use crate::virtualize::{ItemSizes, VirtualWindow, Virtualizer};

/// What the table should draw.
#[derive(Debug)]
pub enum TableView<'a> {
    /// No load has completed yet.
    Loading,
    /// The last load failed. The UI offers a retry that calls
    /// [`DataTable::retry`].
    Error { message: &'a str },
    /// Nothing to show. `filtered` is set when rows exist but the current
    /// filters exclude all of them.
    Empty { filtered: bool },
    /// Rows to draw.
    Rows(RenderedRows<'a>),
}

/// The windowed slice of the table.
#[derive(Debug)]
pub struct RenderedRows<'a> {
    /// Columns to draw, left to right.
    pub columns: Vec<&'a ColumnDescriptor>,
    /// Rows to draw, top to bottom.
    pub rows: Vec<&'a Row>,
    /// Vertical window; `offset_before`/`offset_after` are the spacer
    /// heights.
    pub window: VirtualWindow,
    /// Horizontal window over column widths.
    pub column_window: VirtualWindow,
    /// Rows loaded.
    pub total_rows: usize,
    /// Rows left after filtering.
    pub filtered_rows: usize,
    /// Current page when pagination is enabled.
    pub page: Option<PageSlice>,
    /// A background refresh is in flight.
    pub refreshing: bool,
}

impl RenderedRows<'_> {
    /// Rendered cells, row-major.
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|col| col.render(row)).collect())
            .collect()
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub height: u64,
    pub width: u64,
}

/// Client-side data table.
///
/// # Example
///
/// ```
/// use datagrid::{ColumnDescriptor, DataTable, Row, TableConfig, TableView};
///
/// let mut table = DataTable::new(
///     vec![ColumnDescriptor::new("name", "Name", 200).sortable()],
///     TableConfig::default(),
/// );
/// assert!(matches!(table.view(), TableView::Loading));
///
/// table.set_rows(vec![Row::builder(1).field("name", "Acme").build()]);
/// table.set_global_filter("ACME");
/// assert_eq!(table.visible_len(), 1);
/// ```
#[derive(Debug)]
pub struct DataTable {
    config: TableConfig,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
    view: ViewState,
    /// Indices into `rows`, in display order.
    visible: Vec<usize>,
    pagination: Pagination,
    viewport: Viewport,
    scroll_y: u64,
    scroll_x: u64,
    loading: bool,
    initial_load_complete: bool,
    error: Option<LoadError>,
    store: Option<ViewStateStore>,
    writer: Debouncer,
    restored: bool,
}

impl DataTable {
    /// Create an empty table.
    pub fn new(columns: Vec<ColumnDescriptor>, config: TableConfig) -> Self {
        let writer = Debouncer::new(config.persist_debounce());
        let pagination = Pagination::new(config.page_size);
        Self {
            config,
            columns,
            rows: Vec::new(),
            view: ViewState::default(),
            visible: Vec::new(),
            pagination,
            viewport: Viewport::default(),
            scroll_y: 0,
            scroll_x: 0,
            loading: false,
            initial_load_complete: false,
            error: None,
            store: None,
            writer,
            restored: false,
        }
    }

    /// Attach the store used for persisted view state.
    ///
    /// Only consulted when the config enables persistent filters and sets a
    /// table id.
    pub fn with_store(mut self, store: ViewStateStore) -> Self {
        self.store = Some(store);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// All loaded rows, in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Current filter/sort/search selections.
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Filtered and sorted rows (all pages).
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.visible.iter().map(|&idx| &self.rows[idx])
    }

    /// Number of rows left after filtering.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// A fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// At least one load succeeded.
    pub fn initial_load_complete(&self) -> bool {
        self.initial_load_complete
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Current page, when pagination is enabled.
    pub fn page(&self) -> Option<PageSlice> {
        self.config
            .enable_pagination
            .then(|| paginate::paginate(self.visible.len(), &self.pagination))
    }

    /// Vertical scroll offset in pixels.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_y
    }

    /// Horizontal scroll offset in pixels.
    pub fn scroll_offset_x(&self) -> u64 {
        self.scroll_x
    }

    /// Options of a select filter: distinct values of the column across all
    /// loaded rows.
    pub fn select_options(&self, column: &str) -> Vec<String> {
        column::find(&self.columns, column)
            .map(|col| col.select_options(&self.rows))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Mark a fetch as started. Existing rows stay visible.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply the outcome of a fetch.
    ///
    /// Success replaces the full row set. Failure clears it and puts the
    /// table in its error state.
    pub fn finish_load(&mut self, result: Result<Vec<Row>, LoadError>) {
        self.loading = false;
        match result {
            Ok(rows) => {
                info!("Loaded {} rows", rows.len());
                self.rows = rows;
                self.error = None;
                self.initial_load_complete = true;
            }
            Err(e) => {
                warn!("Load failed: {e}");
                self.rows.clear();
                self.error = Some(e);
            }
        }
        self.rederive();
    }

    /// Replace the rows with already transformed data.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.finish_load(Ok(rows));
    }

    /// Fetch the dataset and transform it into rows.
    ///
    /// Returns the number of rows loaded. The error is also kept for the
    /// error state.
    pub async fn load<S, X>(&mut self, source: &S, transformer: &X) -> Result<usize, LoadError>
    where
        S: DataSource,
        X: RowTransformer<Raw = S::Record>,
    {
        self.begin_load();
        let result = match source.fetch().await {
            Ok(response) => response
                .into_result()
                .map(|records| transform::transform_all(transformer, &records)),
            Err(e) => Err(e),
        };
        let outcome = match &result {
            Ok(rows) => Ok(rows.len()),
            Err(e) => Err(e.clone()),
        };
        self.finish_load(result);
        outcome
    }

    /// Retry after a failed load. Manual only; there is no automatic
    /// backoff.
    pub async fn retry<S, X>(&mut self, source: &S, transformer: &X) -> Result<usize, LoadError>
    where
        S: DataSource,
        X: RowTransformer<Raw = S::Record>,
    {
        debug!("Retrying load");
        self.load(source, transformer).await
    }

    // -------------------------------------------------------------------------
    // Persisted view state
    // -------------------------------------------------------------------------

    /// Restore persisted view state. Runs at most once per table; later
    /// calls return `false` without touching the store.
    pub async fn restore(&mut self) -> bool {
        if self.restored {
            return false;
        }
        self.restored = true;
        let restored = match (&self.store, self.config.persistence_id()) {
            (Some(store), Some(table_id)) => store.load(table_id).await,
            _ => None,
        };
        let Some(state) = restored else {
            return false;
        };
        debug!("Restored view state");
        self.view = state;
        self.pagination.page_index = 0;
        self.rederive();
        true
    }

    /// Write pending view state now instead of waiting for the debounce.
    ///
    /// A write that is already running is awaited instead of repeated.
    pub async fn flush(&mut self) {
        if !self.writer.settle().await {
            return;
        }
        if let (Some(store), Some(table_id)) = (&self.store, self.config.persistence_id())
            && let Err(e) = store.save(table_id, &self.view).await
        {
            warn!("Failed to persist view state for table {table_id}: {e}");
        }
    }

    /// Reset search, column filters and sorting, and delete the persisted
    /// entry. Calling it again changes nothing.
    ///
    /// A write that is already running finishes before the entry is
    /// deleted, so it cannot bring an aspect back.
    pub async fn clear_all(&mut self) {
        self.writer.settle().await;
        self.view = ViewState::default();
        self.pagination.page_index = 0;
        self.rederive();
        if let (Some(store), Some(table_id)) = (&self.store, self.config.persistence_id())
            && let Err(e) = store.clear(table_id).await
        {
            warn!("Failed to clear view state for table {table_id}: {e}");
        }
    }

    fn schedule_persist(&mut self) {
        let (Some(store), Some(table_id)) = (&self.store, self.config.persistence_id()) else {
            return;
        };
        if !self.restored {
            // Saving before the first load would overwrite the stored state.
            debug!("View state of table {table_id} changed before restore, not persisting");
            return;
        }
        let store = store.clone();
        let table_id = table_id.to_string();
        let state = self.view.clone();
        self.writer.call(async move {
            if let Err(e) = store.save(&table_id, &state).await {
                warn!("Failed to persist view state for table {table_id}: {e}");
            }
        });
    }

    // -------------------------------------------------------------------------
    // Filter / search / sort
    // -------------------------------------------------------------------------

    /// Set the global search term.
    pub fn set_global_filter(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.view.global_filter == term {
            return;
        }
        self.view.global_filter = term;
        self.filters_changed();
    }

    /// Set (or with `None`, empty) a column clause.
    pub fn set_column_filter(&mut self, column: &str, value: Option<FilterValue>) {
        let filter = ColumnFilter {
            id: column.to_string(),
            value,
        };
        if self.view.column_filter(column) == Some(&filter) {
            return;
        }
        self.view.set_column_filter(filter);
        self.filters_changed();
    }

    /// Remove a column clause.
    pub fn remove_column_filter(&mut self, column: &str) {
        if self.view.column_filter(column).is_none() {
            return;
        }
        self.view.remove_column_filter(column);
        self.filters_changed();
    }

    /// Header click on a column. Ignored for columns that are not sortable
    /// or when sorting is disabled.
    pub fn toggle_sort(&mut self, column: &str, multi: bool) {
        if !self.config.enable_sorting {
            return;
        }
        if !column::find(&self.columns, column).is_some_and(|c| c.sortable) {
            return;
        }
        self.view.sorting.toggle(column, multi);
        self.rederive();
        self.schedule_persist();
    }

    /// Replace the sort keys.
    pub fn set_sorting(&mut self, sorting: SortState) {
        if self.view.sorting == sorting {
            return;
        }
        self.view.sorting = sorting;
        self.rederive();
        self.schedule_persist();
    }

    /// Replace the whole view state (e.g. from a saved preset).
    pub fn set_view_state(&mut self, view: ViewState) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.filters_changed();
    }

    fn filters_changed(&mut self) {
        self.pagination.page_index = 0;
        self.rederive();
        self.schedule_persist();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Go to a page; clamped to the last page.
    pub fn set_page(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
        self.pagination.page_index = paginate::paginate(self.visible.len(), &self.pagination).page_index;
        self.scroll_y = 0;
    }

    /// Change the page size. Returns `false` (and changes nothing) for a
    /// size not in `page_size_options`.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !self.config.page_size_options.contains(&page_size) {
            return false;
        }
        self.pagination = Pagination::new(page_size);
        self.scroll_y = 0;
        true
    }

    // -------------------------------------------------------------------------
    // Viewport / scrolling
    // -------------------------------------------------------------------------

    /// Set the viewport size (called by the renderer on layout).
    pub fn set_viewport(&mut self, height: u64, width: u64) {
        self.viewport = Viewport { height, width };
        self.clamp_scroll();
    }

    /// Scroll vertically to a pixel offset.
    pub fn scroll_to(&mut self, offset: u64) {
        self.scroll_y = offset;
        self.clamp_scroll();
    }

    /// Scroll horizontally to a pixel offset.
    pub fn scroll_x_to(&mut self, offset: u64) {
        self.scroll_x = offset;
        self.clamp_scroll();
    }

    /// Scroll so that the row at `index` (within the current page) is fully
    /// visible.
    pub fn scroll_to_row(&mut self, index: usize) {
        self.scroll_y = self
            .row_virtualizer()
            .scroll_into_view(index, self.viewport.height, self.scroll_y);
    }

    /// Indices into `visible` shown on the current page.
    fn page_range(&self) -> std::ops::Range<usize> {
        match self.page() {
            Some(page) => page.range,
            None => 0..self.visible.len(),
        }
    }

    fn row_virtualizer(&self) -> Virtualizer {
        Virtualizer::new(
            ItemSizes::Fixed {
                size: self.config.row_height(),
                count: self.page_range().len(),
            },
            self.config.overscan,
        )
        .with_threshold(self.config.virtualization_threshold)
    }

    fn column_virtualizer(&self) -> Virtualizer {
        Virtualizer::new(
            ItemSizes::Variable(self.columns.iter().map(|c| c.width).collect()),
            self.config.overscan,
        )
    }

    fn clamp_scroll(&mut self) {
        self.scroll_y = self
            .scroll_y
            .min(self.row_virtualizer().max_scroll_offset(self.viewport.height));
        self.scroll_x = self
            .scroll_x
            .min(self.column_virtualizer().max_scroll_offset(self.viewport.width));
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// View state with disabled features stripped.
    fn effective_view(&self) -> ViewState {
        ViewState {
            column_filters: if self.config.enable_column_filters {
                self.view.column_filters.clone()
            } else {
                Vec::new()
            },
            global_filter: if self.config.enable_search {
                self.view.global_filter.clone()
            } else {
                String::new()
            },
            sorting: if self.config.enable_sorting {
                self.view.sorting.clone()
            } else {
                SortState::default()
            },
        }
    }

    fn rederive(&mut self) {
        let view = self.effective_view();
        let haystack = match &self.config.searchable_text_key {
            Some(key) => Haystack::Field(key.as_str()),
            None => Haystack::Derived,
        };
        let query = Query::new(&self.columns, &view).haystack(haystack);
        self.visible = engine::derive_visible_rows(&self.rows, &query);
        debug!(
            "Derived {} of {} rows visible",
            self.visible.len(),
            self.rows.len()
        );
        self.pagination.page_index =
            paginate::paginate(self.visible.len(), &self.pagination).page_index;
        self.clamp_scroll();
    }

    /// Snapshot of what to draw.
    pub fn view(&self) -> TableView<'_> {
        if let Some(error) = &self.error {
            return TableView::Error {
                message: error.message(),
            };
        }
        if !self.initial_load_complete {
            return TableView::Loading;
        }
        if self.visible.is_empty() {
            return TableView::Empty {
                filtered: !self.rows.is_empty(),
            };
        }

        let page_range = self.page_range();
        let page_rows = &self.visible[page_range];

        let window = if self.config.enable_virtualization {
            self.row_virtualizer()
                .window(self.viewport.height, self.scroll_y)
        } else {
            full_window(page_rows.len())
        };
        let column_window = if self.config.enable_column_virtualization {
            self.column_virtualizer()
                .window(self.viewport.width, self.scroll_x)
        } else {
            full_window(self.columns.len())
        };

        RenderedRows {
            columns: self.columns[column_window.range()].iter().collect(),
            rows: page_rows[window.range()]
                .iter()
                .map(|&idx| &self.rows[idx])
                .collect(),
            window,
            column_window,
            total_rows: self.rows.len(),
            filtered_rows: self.visible.len(),
            page: self.page(),
            refreshing: self.loading,
        }
        .into()
    }
}

impl<'a> From<RenderedRows<'a>> for TableView<'a> {
    fn from(rows: RenderedRows<'a>) -> Self {
        TableView::Rows(rows)
    }
}

/// A window covering everything, for when windowing is switched off.
fn full_window(len: usize) -> VirtualWindow {
    VirtualWindow {
        start: 0,
        end: len,
        first_visible: 0,
        last_visible: len.saturating_sub(1),
        windowed: false,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::FilterVariant;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("name", "Name", 200).sortable(),
            ColumnDescriptor::new("status", "Status", 120).filter(FilterVariant::Select),
            ColumnDescriptor::new("count", "Count", 100).sortable(),
        ]
    }

    fn rows(n: i64) -> Vec<Row> {
        (0..n)
            .map(|i| {
                Row::builder(i)
                    .field("name", format!("Company {i}"))
                    .field("status", if i % 2 == 0 { "active" } else { "pending" })
                    .hidden("count", i)
                    .build()
            })
            .collect()
    }

    fn loaded(config: TableConfig, n: i64) -> DataTable {
        let mut table = DataTable::new(columns(), config);
        table.set_rows(rows(n));
        table
    }

    #[test]
    fn test_loading_until_first_load() {
        let mut table = DataTable::new(columns(), TableConfig::default());
        assert!(matches!(table.view(), TableView::Loading));
        table.begin_load();
        assert!(table.is_loading());
        assert!(matches!(table.view(), TableView::Loading));
        table.finish_load(Ok(Vec::new()));
        assert!(matches!(table.view(), TableView::Empty { filtered: false }));
    }

    #[test]
    fn test_failed_load_clears_rows() {
        let mut table = loaded(TableConfig::default(), 3);
        table.finish_load(Err(LoadError::rejected(None)));
        assert!(table.rows().is_empty());
        match table.view() {
            TableView::Error { message } => assert_eq!(message, "Failed to load data"),
            other => panic!("expected error view, got {other:?}"),
        }

        table.set_rows(rows(2));
        assert!(table.error().is_none());
        assert!(matches!(table.view(), TableView::Rows(_)));
    }

    #[test]
    fn test_refresh_keeps_rows_visible() {
        let mut table = loaded(TableConfig::default(), 3);
        table.begin_load();
        match table.view() {
            TableView::Rows(rendered) => {
                assert!(rendered.refreshing);
                assert_eq!(rendered.rows.len(), 3);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_filtered_to_nothing() {
        let mut table = loaded(TableConfig::default(), 3);
        table.set_global_filter("nothing matches this");
        assert!(matches!(table.view(), TableView::Empty { filtered: true }));
    }

    #[test]
    fn test_column_filter_and_remove() {
        let mut table = loaded(TableConfig::default(), 10);
        table.set_column_filter("status", Some("active".into()));
        assert_eq!(table.visible_len(), 5);
        table.remove_column_filter("status");
        assert_eq!(table.visible_len(), 10);
    }

    #[test]
    fn test_disabled_features_are_ignored() {
        let config = TableConfig::default()
            .with_search(false)
            .with_column_filters(false)
            .with_sorting(false);
        let mut table = loaded(config, 10);
        table.set_global_filter("company 3");
        table.set_column_filter("status", Some("active".into()));
        table.toggle_sort("name", false);
        assert_eq!(table.visible_len(), 10);
        assert!(table.view_state().sorting.is_empty());
    }

    #[test]
    fn test_toggle_sort_requires_sortable_column() {
        let mut table = loaded(TableConfig::default(), 3);
        table.toggle_sort("status", false);
        assert!(table.view_state().sorting.is_empty());

        table.toggle_sort("count", false);
        table.toggle_sort("count", false);
        let first = table.visible_rows().next().map(|r| r.id().to_string());
        assert_eq!(first.as_deref(), Some("2"));
    }

    #[test]
    fn test_pagination() {
        let mut table = loaded(TableConfig::default().with_pagination(25), 60);
        let page = table.page().unwrap();
        assert_eq!(page.page_count, 3);
        assert_eq!(page.range, 0..25);

        table.set_page(10);
        assert_eq!(table.page().unwrap().page_index, 2);
        match table.view() {
            TableView::Rows(rendered) => assert_eq!(rendered.rows.len(), 10),
            other => panic!("expected rows, got {other:?}"),
        }

        assert!(!table.set_page_size(33));
        assert!(table.set_page_size(50));
        assert_eq!(table.page().unwrap().page_count, 2);

        table.set_page(1);
        table.set_global_filter("company");
        assert_eq!(table.page().unwrap().page_index, 0);
    }

    #[test]
    fn test_virtualized_window() {
        let mut table = loaded(TableConfig::default(), 1000);
        table.set_viewport(480, 800);
        match table.view() {
            TableView::Rows(rendered) => {
                assert!(rendered.window.windowed);
                assert_eq!(rendered.window.range(), 0..15);
                assert_eq!(rendered.rows.len(), 15);
                assert_eq!(rendered.total_rows, 1000);
            }
            other => panic!("expected rows, got {other:?}"),
        }

        table.scroll_to(u64::MAX);
        assert_eq!(table.scroll_offset(), 1000 * 48 - 480);
        match table.view() {
            TableView::Rows(rendered) => {
                assert_eq!(rendered.window.end, 1000);
                assert_eq!(rendered.window.offset_after, 0);
            }
            other => panic!("expected rows, got {other:?}"),
        }

        table.scroll_to_row(0);
        assert_eq!(table.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_clamped_when_rows_shrink() {
        let mut table = loaded(TableConfig::default(), 1000);
        table.set_viewport(480, 800);
        table.scroll_to(40_000);
        table.set_global_filter("company 99");
        // "company 99" and "company 990".."company 999"
        assert_eq!(table.visible_len(), 11);
        assert_eq!(table.scroll_offset(), 48);
    }

    #[test]
    fn test_small_tables_are_not_windowed() {
        let mut table = loaded(TableConfig::default(), 80);
        table.set_viewport(480, 800);
        match table.view() {
            TableView::Rows(rendered) => {
                assert!(!rendered.window.windowed);
                assert_eq!(rendered.rows.len(), 80);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_cells_render_placeholder() {
        let mut table = DataTable::new(columns(), TableConfig::default());
        table.set_rows(vec![Row::builder(1).field("name", "Acme").build()]);
        match table.view() {
            TableView::Rows(rendered) => {
                let cells = rendered.cells();
                assert_eq!(cells[0][0].text, "Acme");
                assert_eq!(cells[0][1].text, crate::row::PLACEHOLDER);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_select_options() {
        let table = loaded(TableConfig::default(), 4);
        assert_eq!(table.select_options("status"), vec!["active", "pending"]);
        assert!(table.select_options("missing").is_empty());
    }
}
