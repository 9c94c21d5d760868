//! File-upload log table.

use datagrid::{ColumnDescriptor, FilterVariant, Row, RowId, RowTransformer};
use serde::Deserialize;

use super::{lenient, status_badge};
use crate::format;

/// Upload log entry as returned by `GET /upload-logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadLogRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<RowId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub uploaded_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_rows: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub processed_rows: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub failed_rows: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub uploaded_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadLogTransformer;

impl RowTransformer for UploadLogTransformer {
    type Raw = UploadLogRecord;

    fn transform(&self, raw: &UploadLogRecord) -> Row {
        Row::builder(raw.id.clone().unwrap_or(RowId::MISSING))
            .field("file_name", format::placeholder_text(raw.file_name.as_deref()))
            .field("uploaded_by", format::placeholder_text(raw.uploaded_by.as_deref()))
            .field("total", format::format_optional_count(raw.total_rows))
            .hidden("total_raw", raw.total_rows)
            .field("processed", format::format_optional_count(raw.processed_rows))
            .hidden("processed_raw", raw.processed_rows)
            .field("failed", format::format_optional_count(raw.failed_rows))
            .hidden("failed_raw", raw.failed_rows)
            .field("uploaded", format::format_date(raw.uploaded_at.as_deref()))
            .hidden(
                "uploaded_raw",
                raw.uploaded_at.as_deref().and_then(format::parse_timestamp),
            )
            .field("status", format::format_status(raw.status.as_deref()))
            .source(raw.total_rows.map(|n| n.to_string()))
            .source(raw.processed_rows.map(|n| n.to_string()))
            .source(raw.failed_rows.map(|n| n.to_string()))
            .source(raw.uploaded_at.as_deref())
            .source(raw.status.as_deref())
            .tag("upload")
            .build()
    }
}

pub(super) fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("file_name", "File", 260)
            .sortable()
            .filter(FilterVariant::Text),
        ColumnDescriptor::new("uploaded_by", "Uploaded by", 180)
            .sortable()
            .filter(FilterVariant::Select),
        ColumnDescriptor::new("total", "Rows", 100)
            .sortable()
            .sort_by("total_raw"),
        ColumnDescriptor::new("processed", "Processed", 110)
            .sortable()
            .sort_by("processed_raw"),
        ColumnDescriptor::new("failed", "Failed", 100)
            .sortable()
            .sort_by("failed_raw"),
        ColumnDescriptor::new("uploaded", "Uploaded", 170)
            .sortable()
            .sort_by("uploaded_raw"),
        ColumnDescriptor::new("status", "Status", 130)
            .sortable()
            .filter(FilterVariant::Select)
            .render_with(status_badge),
    ]
}
