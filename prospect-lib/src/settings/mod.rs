//! Durable view-state storage.
//!
//! [`SqliteBackend`] implements the engine's
//! [`StoreBackend`](datagrid::persist::StoreBackend), so a
//! [`ViewStateStore`](datagrid::persist::ViewStateStore) over it keeps
//! filters and sorting across runs.

mod sqlite;

pub use sqlite::SqliteBackend;

pub use crate::error::SettingsError;
