//! Persisted view state.
//!
//! Filter, search and sort selections are stored per table under
//! namespaced keys, `<prefix>_<tableId>_<aspect>`, one key per aspect
//! (`columnFilters`, `globalFilter`, `sorting`). Values are JSON. There is
//! no schema version: a value that no longer parses is discarded and the
//! aspect falls back to empty.

mod backend;
mod debounce;
mod memory;

pub use backend::StoreBackend;
pub use debounce::Debouncer;
pub use memory::MemoryBackend;

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::engine::ViewState;
use crate::error::PersistError;
use crate::filter::ColumnFilter;
use crate::sort::SortState;

/// Default key prefix.
pub const DEFAULT_PREFIX: &str = "datagrid";

pub const ASPECT_COLUMN_FILTERS: &str = "columnFilters";
pub const ASPECT_GLOBAL_FILTER: &str = "globalFilter";
pub const ASPECT_SORTING: &str = "sorting";

const ASPECTS: [&str; 3] = [ASPECT_COLUMN_FILTERS, ASPECT_GLOBAL_FILTER, ASPECT_SORTING];

/// Load/save/clear of [`ViewState`] keyed by table id.
///
/// Never owns row data. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct ViewStateStore {
    backend: Arc<dyn StoreBackend>,
    prefix: String,
}

impl ViewStateStore {
    /// Create a store over a backend with the default key prefix.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a store over a shared backend.
    pub fn from_arc(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Use a different key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Storage key of one aspect of a table.
    pub fn key(&self, table_id: &str, aspect: &str) -> String {
        format!("{}_{}_{}", self.prefix, table_id, aspect)
    }

    /// Load the persisted state of a table.
    ///
    /// Returns `None` if nothing was ever saved. Aspects that are missing,
    /// unreadable or unparseable are left empty; no error reaches the
    /// caller.
    pub async fn load(&self, table_id: &str) -> Option<ViewState> {
        let column_filters: Option<Vec<ColumnFilter>> =
            self.read(table_id, ASPECT_COLUMN_FILTERS).await;
        let global_filter: Option<String> = self.read(table_id, ASPECT_GLOBAL_FILTER).await;
        let sorting: Option<SortState> = self.read(table_id, ASPECT_SORTING).await;

        if column_filters.is_none() && global_filter.is_none() && sorting.is_none() {
            debug!("No persisted view state for table {table_id}");
            return None;
        }
        Some(ViewState {
            column_filters: column_filters.unwrap_or_default(),
            global_filter: global_filter.unwrap_or_default(),
            sorting: sorting.unwrap_or_default(),
        })
    }

    /// Save the state of a table (all aspects).
    pub async fn save(&self, table_id: &str, state: &ViewState) -> Result<(), PersistError> {
        self.write(table_id, ASPECT_COLUMN_FILTERS, &state.column_filters)
            .await?;
        self.write(table_id, ASPECT_GLOBAL_FILTER, &state.global_filter)
            .await?;
        self.write(table_id, ASPECT_SORTING, &state.sorting).await?;
        debug!("Saved view state for table {table_id}");
        Ok(())
    }

    /// Delete the persisted state of a table. Clearing twice is fine.
    pub async fn clear(&self, table_id: &str) -> Result<(), PersistError> {
        for aspect in ASPECTS {
            self.backend.delete(&self.key(table_id, aspect)).await?;
        }
        debug!("Cleared view state for table {table_id}");
        Ok(())
    }

    /// Ids of all tables with persisted state.
    pub async fn table_ids(&self) -> Result<Vec<String>, PersistError> {
        let prefix = format!("{}_", self.prefix);
        let mut ids: Vec<String> = self
            .backend
            .keys_with_prefix(&prefix)
            .await?
            .into_iter()
            .filter_map(|key| {
                let rest = key.strip_prefix(&prefix)?;
                ASPECTS.iter().find_map(|aspect| {
                    rest.strip_suffix(aspect)
                        .and_then(|id| id.strip_suffix('_'))
                        .map(str::to_string)
                })
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn read<T: DeserializeOwned>(&self, table_id: &str, aspect: &str) -> Option<T> {
        let key = self.key(table_id, aspect);
        let bytes = match self.backend.get_bytes(&key).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!("Failed to read {key}: {e}");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding unparseable persisted value {key}: {e}");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        table_id: &str,
        aspect: &str,
        value: &T,
    ) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend
            .set_bytes(&self.key(table_id, aspect), bytes)
            .await
    }
}

impl std::fmt::Debug for ViewStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
