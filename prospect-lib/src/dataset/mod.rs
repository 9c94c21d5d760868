//! Dashboard datasets.
//!
//! Each dataset module defines the raw record shape returned by the server,
//! its [`RowTransformer`](datagrid::RowTransformer) and its column set.

mod companies;
mod contacts;
mod uploads;

pub use companies::{CompanyRecord, CompanyTransformer};
pub use contacts::{ContactRecord, ContactTransformer};
pub use uploads::{UploadLogRecord, UploadLogTransformer};

use std::fmt;
use std::str::FromStr;

use datagrid::row::UNKNOWN;
use datagrid::{Cell, ColumnDescriptor, DataTable, LoadError, RowId, TableConfig, Tone, Value};
use serde::Deserializer;
use serde::de::DeserializeOwned;

use crate::source::{FileSource, HttpSource, Origin};

/// The tables of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Companies,
    Contacts,
    Uploads,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Companies, Dataset::Contacts, Dataset::Uploads];

    /// Short name, also the persisted table id.
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Companies => "companies",
            Dataset::Contacts => "contacts",
            Dataset::Uploads => "uploads",
        }
    }

    /// API path relative to the base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Dataset::Companies => "companies",
            Dataset::Contacts => "contacts",
            Dataset::Uploads => "upload-logs",
        }
    }

    pub fn columns(self) -> Vec<ColumnDescriptor> {
        match self {
            Dataset::Companies => companies::columns(),
            Dataset::Contacts => contacts::columns(),
            Dataset::Uploads => uploads::columns(),
        }
    }

    /// Default table config: persisted filters under the dataset name.
    pub fn config(self) -> TableConfig {
        TableConfig::default()
            .with_persistent_filters(true)
            .with_table_id(self.name())
    }

    /// Fetch the dataset from `origin` into `table`.
    pub async fn load(self, table: &mut DataTable, origin: &Origin) -> Result<usize, LoadError> {
        match self {
            Dataset::Companies => load_with(table, origin, self, &CompanyTransformer).await,
            Dataset::Contacts => load_with(table, origin, self, &ContactTransformer).await,
            Dataset::Uploads => load_with(table, origin, self, &UploadLogTransformer).await,
        }
    }
}

async fn load_with<X>(
    table: &mut DataTable,
    origin: &Origin,
    dataset: Dataset,
    transformer: &X,
) -> Result<usize, LoadError>
where
    X: datagrid::RowTransformer,
    X::Raw: DeserializeOwned + Send + 'static,
{
    match origin {
        Origin::Http { base, token } => {
            let url = base
                .join(dataset.endpoint())
                .map_err(|e| LoadError::transport(format!("Invalid URL: {e}")))?;
            let mut source = HttpSource::<X::Raw>::new(url);
            if let Some(token) = token {
                source = source.with_token(token.clone());
            }
            table.load(&source, transformer).await
        }
        Origin::File(path) => {
            let source = FileSource::<X::Raw>::new(path.clone());
            table.load(&source, transformer).await
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "companies" | "company" => Ok(Dataset::Companies),
            "contacts" | "contact" => Ok(Dataset::Contacts),
            "uploads" | "upload" | "upload-logs" => Ok(Dataset::Uploads),
            other => Err(format!("unknown dataset: {other}")),
        }
    }
}

/// Badge tone of a status label.
pub fn status_tone(status: &str) -> Tone {
    match status.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
        "active" | "completed" | "complete" | "success" | "won" | "customer" => Tone::Success,
        "new" | "lead" | "prospect" | "pending" | "processing" | "in progress" | "queued" => {
            Tone::Info
        }
        "inactive" | "paused" | "partial" | "partially completed" => Tone::Warning,
        "failed" | "error" | "churned" | "lost" | "bounced" => Tone::Danger,
        _ => Tone::Neutral,
    }
}

/// Status column renderer: a toned badge, `Unknown` when missing.
pub(crate) fn status_badge(value: &Value) -> Cell {
    let text = if value.is_null() {
        UNKNOWN.to_string()
    } else {
        value.display()
    };
    let tone = status_tone(&text);
    Cell::badge(text, tone)
}

/// Lenient field decoding.
///
/// Server records are not validated; a field of the wrong type becomes
/// `None` (and so a placeholder) instead of failing the whole response.
pub(crate) mod lenient {
    use super::*;

    /// Any scalar as text. Blank strings are `None`.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value: serde_json::Value = serde::Deserialize::deserialize(d)?;
        Ok(match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// A record id. Integers (also whole floats) become numeric ids, other
    /// numbers and non-blank strings become string ids, anything else is
    /// `None`.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RowId>, D::Error> {
        let value: serde_json::Value = serde::Deserialize::deserialize(d)?;
        Ok(match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(RowId::Num(i)),
                None => match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Some(RowId::Num(f as i64))
                    }
                    _ => Some(RowId::Str(n.to_string())),
                },
            },
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(RowId::Str(s)),
            _ => None,
        })
    }

    /// An integer count, from a number or a numeric string (`"1,200"`).
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value: serde_json::Value = serde::Deserialize::deserialize(d)?;
        Ok(match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
            serde_json::Value::String(s) => {
                let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
                cleaned.trim().parse::<i64>().ok()
            }
            _ => None,
        })
    }
}
