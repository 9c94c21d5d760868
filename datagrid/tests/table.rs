use std::sync::Mutex;

use async_trait::async_trait;
use datagrid::{
    ApiResponse, ColumnDescriptor, DataSource, DataTable, LoadError, Row, RowTransformer,
    TableConfig, TableView,
};

#[derive(Debug, Clone)]
struct Lead {
    id: i64,
    name: Option<String>,
}

/// Replays queued responses, one per fetch.
struct ScriptedSource {
    responses: Mutex<Vec<Result<ApiResponse<Lead>, LoadError>>>,
}

impl ScriptedSource {
    fn new(mut responses: Vec<Result<ApiResponse<Lead>, LoadError>>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    type Record = Lead;

    async fn fetch(&self) -> Result<ApiResponse<Lead>, LoadError> {
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(LoadError::transport("no more responses")))
    }
}

struct LeadTransformer;

impl RowTransformer for LeadTransformer {
    type Raw = Lead;

    fn transform(&self, raw: &Lead) -> Row {
        Row::builder(raw.id)
            .field("name", raw.name.as_deref())
            .tag("lead")
            .build()
    }
}

fn leads(n: i64) -> Vec<Lead> {
    (1..=n)
        .map(|id| Lead {
            id,
            name: (id % 3 != 0).then(|| format!("Lead {id}")),
        })
        .collect()
}

fn new_table() -> DataTable {
    DataTable::new(
        vec![ColumnDescriptor::new("name", "Name", 240).sortable()],
        TableConfig::default(),
    )
}

#[tokio::test]
async fn test_load_transforms_records() {
    let source = ScriptedSource::new(vec![Ok(ApiResponse::ok(leads(6)))]);
    let mut table = new_table();

    assert_eq!(table.load(&source, &LeadTransformer).await, Ok(6));
    assert!(table.initial_load_complete());
    assert!(!table.is_loading());

    let TableView::Rows(rendered) = table.view() else {
        panic!("expected rows");
    };
    assert_eq!(rendered.total_rows, 6);
    let cells = rendered.cells();
    assert_eq!(cells[0][0].text, "Lead 1");
    assert_eq!(cells[2][0].text, "—");
}

#[tokio::test]
async fn test_rejected_response_then_retry() {
    let source = ScriptedSource::new(vec![
        Ok(ApiResponse::failed("Session expired")),
        Ok(ApiResponse::ok(leads(2))),
    ]);
    let mut table = new_table();

    let err = table.load(&source, &LeadTransformer).await.unwrap_err();
    assert_eq!(err.message(), "Session expired");
    assert!(matches!(
        table.view(),
        TableView::Error {
            message: "Session expired"
        }
    ));

    assert_eq!(table.retry(&source, &LeadTransformer).await, Ok(2));
    assert!(matches!(table.view(), TableView::Rows(_)));
}

#[tokio::test]
async fn test_failed_refresh_clears_rows() {
    let source = ScriptedSource::new(vec![
        Ok(ApiResponse::ok(leads(4))),
        Err(LoadError::transport("connection reset")),
    ]);
    let mut table = new_table();
    table.load(&source, &LeadTransformer).await.unwrap();
    assert_eq!(table.rows().len(), 4);

    table.load(&source, &LeadTransformer).await.unwrap_err();
    assert!(table.rows().is_empty());
    assert_eq!(table.error().map(LoadError::message), Some("connection reset"));
}

#[tokio::test]
async fn test_failure_without_message_uses_fallback() {
    let response = ApiResponse {
        success: false,
        result: Vec::new(),
        message: None,
    };
    let source = ScriptedSource::new(vec![Ok(response)]);
    let mut table = new_table();
    table.load(&source, &LeadTransformer).await.unwrap_err();

    let TableView::Error { message } = table.view() else {
        panic!("expected error");
    };
    assert_eq!(message, "Failed to load data");
}

#[tokio::test]
async fn test_search_over_loaded_rows() {
    let source = ScriptedSource::new(vec![Ok(ApiResponse::ok(leads(12)))]);
    let mut table = new_table();
    table.load(&source, &LeadTransformer).await.unwrap();

    table.set_global_filter("LEAD 1");
    // Lead 1, Lead 10 and Lead 11. Lead 12 has no name.
    assert_eq!(table.visible_len(), 3);

    table.set_global_filter("lead");
    assert_eq!(table.visible_len(), 12);

    table.toggle_sort("name", false);
    table.toggle_sort("name", false);
    let last = table.visible_rows().last().map(|r| r.id().to_string());
    assert_eq!(last.as_deref(), Some("12"));
}

#[tokio::test]
async fn test_column_virtualization() {
    let columns = (0..40)
        .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Column {i}"), 100))
        .collect();
    let mut table = DataTable::new(
        columns,
        TableConfig::default()
            .with_column_virtualization(true)
            .with_overscan(1),
    );
    table.set_rows(vec![Row::builder(1).field("c0", "x").build()]);
    table.set_viewport(480, 500);
    table.scroll_x_to(1000);

    let TableView::Rows(rendered) = table.view() else {
        panic!("expected rows");
    };
    assert_eq!(rendered.column_window.range(), 9..16);
    assert_eq!(rendered.columns.len(), 7);
    assert_eq!(rendered.columns[0].key, "c9");
    assert_eq!(rendered.column_window.offset_before, 900);
}
