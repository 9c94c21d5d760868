//! Client-side data grid engine
//!
//! Takes a full in-memory dataset fetched once from a server and provides
//! global/column filtering, stable multi-key sorting, pagination, row and
//! column virtualization, and debounced persistence of the view state.
//! Nothing in here knows how a cell is drawn; a UI layer consumes
//! [`TableView`] snapshots.

pub mod column;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod paginate;
pub mod persist;
pub mod row;
pub mod sort;
pub mod source;
pub mod table;
pub mod transform;
pub mod value;
pub mod virtualize;

pub use column::{Cell, ColumnDescriptor, FilterVariant, Tone};
pub use config::{Density, TableConfig};
pub use engine::{Haystack, Query, ViewState, apply, derive_visible_rows};
pub use error::{LoadError, PersistError};
pub use filter::{ColumnFilter, FilterValue};
pub use row::{Row, RowBuilder, RowId};
pub use sort::{SortKey, SortState};
pub use source::{ApiResponse, DataSource};
pub use table::{DataTable, RenderedRows, TableView};
pub use transform::{RowTransformer, transform_all};
pub use value::Value;
pub use virtualize::{ItemSizes, VirtualWindow, Virtualizer};
