use std::path::PathBuf;

use clap::Parser;
use datagrid::{Density, FilterValue, SortKey};
use prospect_lib::Dataset;

/// prospect - query the dashboard tables from the terminal
#[derive(Parser, Debug)]
#[command(name = "prospect")]
#[command(version)]
#[command(about = "Search, filter, sort and page through dashboard tables", long_about = None)]
pub struct Cli {
    /// Table to show (companies, contacts, uploads)
    #[arg(value_parser = parse_dataset)]
    pub dataset: Dataset,

    /// API base URL (e.g., https://crm.example.com/api)
    #[arg(short = 'u', long = "url", conflicts_with = "file")]
    pub url: Option<String>,

    /// Bearer token sent with API requests
    #[arg(long = "token", env = "PROSPECT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Read the dataset from a JSON file instead of the API
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Global search term
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Column filter, `column=value`. `a|b` filters by membership,
    /// numbers and true/false by equality. An empty value removes the filter.
    #[arg(long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, Option<FilterValue>)>,

    /// Sort key, `column[:desc]`. Repeat for multi-column sorting.
    #[arg(long = "sort", value_name = "COLUMN[:desc]", value_parser = parse_sort)]
    pub sort: Vec<SortKey>,

    /// Enable pagination with this page size
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Page to show (1-based)
    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    /// Viewport height in pixels
    #[arg(long = "height", value_name = "PX", default_value_t = 720)]
    pub height: u64,

    /// Viewport width in pixels
    #[arg(long = "width", value_name = "PX", default_value_t = 1280)]
    pub width: u64,

    /// Vertical scroll offset in pixels
    #[arg(long = "scroll", value_name = "PX")]
    pub scroll: Option<u64>,

    /// Scroll so that this row (0-based, within the page) is visible
    #[arg(long = "row", conflicts_with = "scroll")]
    pub row: Option<usize>,

    /// Row density (compact, standard, comfortable)
    #[arg(long = "density", value_parser = parse_density)]
    pub density: Option<Density>,

    /// Table config as JSON (same keys as the dashboard's table config)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Persisted view-state id (defaults to the dataset name)
    #[arg(long = "table-id")]
    pub table_id: Option<String>,

    /// Do not restore or save filters and sorting
    #[arg(long = "no-persist")]
    pub no_persist: bool,

    /// Clear the persisted filters and sorting of the table and exit
    #[arg(long = "clear")]
    pub clear: bool,

    /// Print the ids of tables with persisted view state and exit
    #[arg(long = "saved")]
    pub saved: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

fn parse_dataset(s: &str) -> Result<Dataset, String> {
    s.parse()
}

/// `column=value` into a clause. Values: `a|b` → list, number, `true` /
/// `false` → bool, anything else → text; empty → no clause.
pub fn parse_filter(s: &str) -> Result<(String, Option<FilterValue>), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got `{s}`"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in `{s}`"));
    }
    Ok((column.to_string(), parse_filter_value(value)))
}

fn parse_filter_value(raw: &str) -> Option<FilterValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains('|') {
        let items: Vec<String> = raw
            .split('|')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return Some(FilterValue::List(items));
    }
    if let Some(n) = raw.parse::<f64>().ok().filter(|n| n.is_finite()) {
        return Some(FilterValue::Number(n));
    }
    match raw.to_lowercase().as_str() {
        "true" => Some(FilterValue::Bool(true)),
        "false" => Some(FilterValue::Bool(false)),
        _ => Some(FilterValue::Text(raw.to_string())),
    }
}

/// `column`, `column:asc` or `column:desc`.
pub fn parse_sort(s: &str) -> Result<SortKey, String> {
    let (column, direction) = s.split_once(':').unwrap_or((s, "asc"));
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in `{s}`"));
    }
    match direction.trim().to_lowercase().as_str() {
        "asc" => Ok(SortKey::asc(column)),
        "desc" => Ok(SortKey::desc(column)),
        other => Err(format!("unknown sort direction `{other}`, expected asc or desc")),
    }
}

fn parse_density(s: &str) -> Result<Density, String> {
    match s.trim().to_lowercase().as_str() {
        "compact" => Ok(Density::Compact),
        "standard" => Ok(Density::Standard),
        "comfortable" => Ok(Density::Comfortable),
        other => Err(format!("unknown density `{other}`")),
    }
}
