//! Contacts table.

use datagrid::{ColumnDescriptor, FilterVariant, Row, RowId, RowTransformer};
use serde::Deserialize;

use super::{lenient, status_badge};
use crate::format;

/// Contact record as returned by `GET /contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<RowId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl ContactRecord {
    /// `First Last`, or whichever part is present.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactTransformer;

impl RowTransformer for ContactTransformer {
    type Raw = ContactRecord;

    fn transform(&self, raw: &ContactRecord) -> Row {
        Row::builder(raw.id.clone().unwrap_or(RowId::MISSING))
            .field("name", format::placeholder_text(raw.full_name().as_deref()))
            .field("email", format::placeholder_text(raw.email.as_deref()))
            .field("title", format::placeholder_text(raw.title.as_deref()))
            .field("company", format::placeholder_text(raw.company.as_deref()))
            .field("phone", format::placeholder_text(raw.phone.as_deref()))
            .field("created", format::format_date(raw.created_at.as_deref()))
            .hidden(
                "created_raw",
                raw.created_at.as_deref().and_then(format::parse_timestamp),
            )
            .field("status", format::format_status(raw.status.as_deref()))
            .source(raw.first_name.as_deref())
            .source(raw.last_name.as_deref())
            .source(raw.created_at.as_deref())
            .source(raw.status.as_deref())
            .tag("contact")
            .build()
    }
}

pub(super) fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name", 200)
            .sortable()
            .filter(FilterVariant::Text),
        ColumnDescriptor::new("email", "Email", 240)
            .sortable()
            .filter(FilterVariant::Text),
        ColumnDescriptor::new("title", "Title", 180).sortable(),
        ColumnDescriptor::new("company", "Company", 200)
            .sortable()
            .filter(FilterVariant::Select),
        ColumnDescriptor::new("phone", "Phone", 150),
        ColumnDescriptor::new("created", "Created", 170)
            .sortable()
            .sort_by("created_raw"),
        ColumnDescriptor::new("status", "Status", 120)
            .sortable()
            .filter(FilterVariant::MultiSelect)
            .render_with(status_badge),
    ]
}
