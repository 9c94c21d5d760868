//! Filter/sort engine.
//!
//! Explicit recomputation: every function here takes all of its inputs as
//! parameters and returns the derived result. Filtering runs first (global
//! search, then column clauses), sorting last, so sorting can never change
//! which rows are included.

use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

use crate::column::{self, ColumnDescriptor};
use crate::filter::{self, ColumnFilter, FilterValue};
use crate::row::Row;
use crate::sort::{self, SortState};

/// Filter, sort and search selections of one table.
///
/// This is also the persisted view state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub column_filters: Vec<ColumnFilter>,
    #[serde(default)]
    pub global_filter: String,
    #[serde(default)]
    pub sorting: SortState,
}

impl ViewState {
    /// Returns `true` if nothing would filter or reorder rows.
    pub fn is_empty(&self) -> bool {
        self.global_filter.trim().is_empty()
            && self.sorting.is_empty()
            && self.column_filters.iter().all(|f| f.active_value().is_none())
    }

    /// Returns `true` if any filter (global or column) is active.
    pub fn is_filtered(&self) -> bool {
        !self.global_filter.trim().is_empty()
            || self.column_filters.iter().any(|f| f.active_value().is_some())
    }

    /// Returns the clause for a column, if any.
    pub fn column_filter(&self, id: &str) -> Option<&ColumnFilter> {
        self.column_filters.iter().find(|f| f.id == id)
    }

    /// Sets or replaces the clause for a column, keeping clause order.
    pub fn set_column_filter(&mut self, filter: ColumnFilter) {
        match self.column_filters.iter_mut().find(|f| f.id == filter.id) {
            Some(existing) => *existing = filter,
            None => self.column_filters.push(filter),
        }
    }

    /// Removes the clause for a column.
    pub fn remove_column_filter(&mut self, id: &str) {
        self.column_filters.retain(|f| f.id != id);
    }
}

/// Where global search looks for its haystack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Haystack<'a> {
    /// The row's derived searchable text.
    #[default]
    Derived,
    /// A string field of the row.
    Field(&'a str),
}

/// Inputs of one engine pass.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub columns: &'a [ColumnDescriptor],
    pub view: &'a ViewState,
    pub haystack: Haystack<'a>,
}

impl<'a> Query<'a> {
    pub fn new(columns: &'a [ColumnDescriptor], view: &'a ViewState) -> Self {
        Self {
            columns,
            view,
            haystack: Haystack::Derived,
        }
    }

    pub fn haystack(mut self, haystack: Haystack<'a>) -> Self {
        self.haystack = haystack;
        self
    }
}

/// Computes the indices of the visible rows, in display order.
pub fn derive_visible_rows(rows: &[Row], query: &Query<'_>) -> Vec<usize> {
    let term = filter::normalize_search(&query.view.global_filter);

    // Resolve each active clause to (clause, field, variant) once. Number
    // and bool clauses compare against the raw sort field, since the
    // display field of a count is formatted text.
    let clauses: Vec<_> = query
        .view
        .column_filters
        .iter()
        .filter_map(|f| Some((f, f.active_value()?)))
        .map(|(f, value)| match column::find(query.columns, &f.id) {
            Some(col) => {
                let field = match value {
                    FilterValue::Number(_) | FilterValue::Bool(_) => col.sort_field(),
                    _ => col.key.as_str(),
                };
                (f, field, col.filter)
            }
            None => (f, f.id.as_str(), None),
        })
        .collect();

    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| match &term {
            None => true,
            Some(term) => {
                let haystack = match query.haystack {
                    Haystack::Derived => row.searchable_text().map(Cow::Borrowed),
                    Haystack::Field(key) => row
                        .get(key)
                        .and_then(|v| v.as_str())
                        .map(|text| Cow::Owned(text.to_lowercase())),
                };
                filter::matches_global(row, haystack.as_deref(), term)
            }
        })
        .filter(|(_, row)| {
            clauses
                .iter()
                .all(|(clause, field, variant)| clause.matches(row, field, *variant))
        })
        .map(|(idx, _)| idx)
        .collect();

    sort::sort_indices(&mut indices, rows, query.columns, &query.view.sorting);
    indices
}

/// Filters and sorts `rows`, returning the visible rows in display order.
pub fn apply(rows: &[Row], query: &Query<'_>) -> Vec<Row> {
    derive_visible_rows(rows, query)
        .into_iter()
        .map(|idx| rows[idx].clone())
        .collect()
}
