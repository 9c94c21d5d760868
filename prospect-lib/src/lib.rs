//! Prospect dashboard tables
//!
//! Datasets (companies, contacts, upload logs) on top of the `datagrid`
//! engine: raw record shapes, formatters, row transformers and column sets,
//! plus the HTTP/file data sources and the SQLite view-state backend.

pub mod dataset;
pub mod error;
pub mod format;
pub mod settings;
pub mod source;

pub use dataset::Dataset;
pub use error::{SettingsError, SourceError};
pub use settings::SqliteBackend;
pub use source::{FileSource, HttpSource, Origin};
