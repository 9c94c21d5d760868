//! Companies table.

use datagrid::{ColumnDescriptor, FilterVariant, Row, RowId, RowTransformer};
use serde::Deserialize;

use super::{lenient, status_badge};
use crate::format;

/// Company record as returned by `GET /companies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<RowId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub employee_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub contact_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyTransformer;

impl RowTransformer for CompanyTransformer {
    type Raw = CompanyRecord;

    fn transform(&self, raw: &CompanyRecord) -> Row {
        Row::builder(raw.id.clone().unwrap_or(RowId::MISSING))
            .field("name", format::placeholder_text(raw.name.as_deref()))
            .field("domain", format::placeholder_text(raw.domain.as_deref()))
            .field("industry", format::placeholder_text(raw.industry.as_deref()))
            .field("employees", format::format_optional_count(raw.employee_count))
            .hidden("employees_raw", raw.employee_count)
            .field("contacts", format::format_optional_count(raw.contact_count))
            .hidden("contacts_raw", raw.contact_count)
            .field("created", format::format_date(raw.created_at.as_deref()))
            .hidden(
                "created_raw",
                raw.created_at.as_deref().and_then(format::parse_timestamp),
            )
            .field("status", format::format_status(raw.status.as_deref()))
            .source(raw.employee_count.map(|n| n.to_string()))
            .source(raw.contact_count.map(|n| n.to_string()))
            .source(raw.created_at.as_deref())
            .source(raw.status.as_deref())
            .tag("company")
            .build()
    }
}

pub(super) fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Company", 240)
            .sortable()
            .filter(FilterVariant::Text),
        ColumnDescriptor::new("domain", "Domain", 200)
            .sortable()
            .filter(FilterVariant::Text),
        ColumnDescriptor::new("industry", "Industry", 160)
            .sortable()
            .filter(FilterVariant::Select),
        ColumnDescriptor::new("employees", "Employees", 120)
            .sortable()
            .sort_by("employees_raw"),
        ColumnDescriptor::new("contacts", "Contacts", 110)
            .sortable()
            .sort_by("contacts_raw"),
        ColumnDescriptor::new("created", "Created", 170)
            .sortable()
            .sort_by("created_raw"),
        ColumnDescriptor::new("status", "Status", 120)
            .sortable()
            .filter(FilterVariant::Select)
            .render_with(status_badge),
    ]
}
