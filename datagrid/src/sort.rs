//! Multi-key sort state and comparator.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::column::{self, ColumnDescriptor, Comparator};
use crate::row::Row;
use crate::value::Value;

/// One sort key: column id and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortKey {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Ordered sort keys. Rows equal on key `i` are ordered by key `i + 1`;
/// rows equal on every key keep their original relative order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(pub Vec<SortKey>);

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Direction of a column in this state, `Some(desc)` if sorted.
    pub fn direction(&self, id: &str) -> Option<bool> {
        self.0.iter().find(|k| k.id == id).map(|k| k.desc)
    }

    /// Header click.
    ///
    /// Cycles the column ascending → descending → unsorted. With `multi`
    /// the other keys are kept (the column is appended when new); without
    /// it the column becomes the only key.
    pub fn toggle(&mut self, id: &str, multi: bool) {
        let next = match self.direction(id) {
            None => Some(false),
            Some(false) => Some(true),
            Some(true) => None,
        };

        if !multi {
            self.0.retain(|k| k.id == id);
        }
        match next {
            Some(desc) => match self.0.iter_mut().find(|k| k.id == id) {
                Some(key) => key.desc = desc,
                None => self.0.push(SortKey {
                    id: id.to_string(),
                    desc,
                }),
            },
            None => self.0.retain(|k| k.id != id),
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// A sort key resolved against the column set.
struct ResolvedKey<'a> {
    field: &'a str,
    desc: bool,
    comparator: Option<&'a Comparator>,
}

/// Compares two field values for one key. Nulls sort last in both
/// directions.
fn compare_values(a: &Value, b: &Value, desc: bool, comparator: Option<&Comparator>) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = match comparator {
                Some(compare) => compare(a, b),
                None => a.compare(b),
            };
            if desc { ordering.reverse() } else { ordering }
        }
    }
}

/// Stable multi-key sort of row indices.
///
/// Keys naming an unknown column sort by the field of that name with the
/// default ordering.
pub fn sort_indices(indices: &mut [usize], rows: &[Row], columns: &[ColumnDescriptor], sort: &SortState) {
    if sort.is_empty() {
        return;
    }
    let keys: Vec<ResolvedKey<'_>> = sort
        .keys()
        .iter()
        .map(|key| match column::find(columns, &key.id) {
            Some(col) => ResolvedKey {
                field: col.sort_field(),
                desc: key.desc,
                comparator: col.comparator(),
            },
            None => ResolvedKey {
                field: &key.id,
                desc: key.desc,
                comparator: None,
            },
        })
        .collect();

    // slice::sort_by is stable
    indices.sort_by(|&a, &b| {
        let (a, b) = (&rows[a], &rows[b]);
        keys.iter()
            .map(|key| compare_values(a.value(key.field), b.value(key.field), key.desc, key.comparator))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}
