//! Row transformer contract.

use crate::row::{Row, RowId};

/// Maps one raw server record into a display row.
///
/// Implementations are pure: no I/O, no shared state. Missing or malformed
/// source fields become placeholders; a record is never dropped and a
/// transform never fails. Searchable text is derived by the
/// [`RowBuilder`](crate::RowBuilder) from the fields the transformer
/// declares searchable.
pub trait RowTransformer: Send + Sync {
    /// Raw record shape.
    type Raw;

    /// Transforms one record.
    fn transform(&self, raw: &Self::Raw) -> Row;
}

/// Transforms a whole dataset.
///
/// Always re-run in full when the dataset changes; rows are never patched
/// incrementally. A row built with [`RowId::MISSING`] gets `#<position>` as
/// its id.
pub fn transform_all<T: RowTransformer + ?Sized>(transformer: &T, raw: &[T::Raw]) -> Vec<Row> {
    raw.iter()
        .enumerate()
        .map(|(idx, record)| {
            let mut row = transformer.transform(record);
            if row.id().is_missing() {
                row.set_id(RowId::Str(format!("#{idx}")));
            }
            row
        })
        .collect()
}
