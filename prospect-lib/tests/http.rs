use datagrid::{DataSource, DataTable, LoadError, TableView};
use prospect_lib::dataset::CompanyRecord;
use prospect_lib::{Dataset, HttpSource, Origin};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Answer one request with `status` and a JSON `body`. The handle yields
/// the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&head).to_lowercase()
    });

    (format!("http://{addr}/api"), handle)
}

fn companies_source(base: &str) -> HttpSource<CompanyRecord> {
    let url = Url::parse(&format!("{base}/companies")).unwrap();
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpSource::new(url).with_client(client)
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"success": true, "result": [{"id": 1, "name": "Acme"}, {"id": 2, "name": "Globex"}]}"#,
    )
    .await;

    let source = companies_source(&base).with_token("s3cret");
    let response = source.fetch().await.unwrap();
    assert_eq!(response.result.len(), 2);

    let request = server.await.unwrap();
    assert!(request.starts_with("get /api/companies "), "{request}");
    assert!(request.contains("authorization: bearer s3cret"), "{request}");
}

#[tokio::test]
async fn test_no_token_no_authorization_header() {
    let (base, server) = serve_once("200 OK", r#"{"success": true, "result": []}"#).await;

    let source = companies_source(&base);
    assert!(source.fetch().await.unwrap().result.is_empty());
    assert!(!server.await.unwrap().contains("authorization:"));
}

#[tokio::test]
async fn test_error_status_uses_envelope_message() {
    let (base, _server) = serve_once(
        "500 Internal Server Error",
        r#"{"success": false, "message": "Database unavailable"}"#,
    )
    .await;

    let source = companies_source(&base);
    assert_eq!(
        source.fetch().await.unwrap_err(),
        LoadError::Rejected("Database unavailable".into())
    );
}

#[tokio::test]
async fn test_error_status_without_envelope_uses_reason() {
    let (base, _server) = serve_once("502 Bad Gateway", "upstream timed out").await;

    let source = companies_source(&base);
    assert_eq!(
        source.fetch().await.unwrap_err(),
        LoadError::Rejected("Bad Gateway".into())
    );
}

#[tokio::test]
async fn test_unauthorized_is_transport_error() {
    let (base, _server) = serve_once(
        "401 Unauthorized",
        r#"{"success": false, "message": "Token expired"}"#,
    )
    .await;

    let source = companies_source(&base).with_token("stale");
    assert_eq!(
        source.fetch().await.unwrap_err(),
        LoadError::Transport("Not authorized: Token expired".into())
    );
}

#[tokio::test]
async fn test_rejected_response_puts_table_in_error_state() {
    let (base, server) = serve_once("200 OK", r#"{"success": false, "message": "Quota exceeded"}"#)
        .await;

    let origin = Origin::http(&base, Some("s3cret".into())).unwrap();
    let mut table = DataTable::new(Dataset::Companies.columns(), Dataset::Companies.config());
    let err = Dataset::Companies.load(&mut table, &origin).await.unwrap_err();

    assert_eq!(err, LoadError::Rejected("Quota exceeded".into()));
    assert!(matches!(
        table.view(),
        TableView::Error { message: "Quota exceeded" }
    ));
    assert!(table.rows().is_empty());
    assert!(server.await.unwrap().starts_with("get /api/companies "));
}
