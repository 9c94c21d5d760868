use datagrid::{DataTable, Row, Tone, Value, transform_all};
use prospect_lib::Dataset;
use prospect_lib::dataset::{
    CompanyRecord, CompanyTransformer, ContactRecord, ContactTransformer, UploadLogRecord,
    UploadLogTransformer,
};

fn companies() -> Vec<CompanyRecord> {
    serde_json::from_str(
        r#"[
            {
                "id": 1,
                "name": "Acme Corp",
                "domain": "acme.example",
                "industry": "Software",
                "employee_count": 1200,
                "contact_count": "34",
                "created_at": "2024-03-04T09:15:00Z",
                "status": "active"
            },
            {
                "id": "c-2",
                "name": null,
                "employee_count": "lots",
                "created_at": "not a date"
            },
            {
                "id": 3,
                "name": "Globex",
                "industry": "",
                "employee_count": 45000.0,
                "status": "churned"
            }
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_company_rows() {
    let rows = transform_all(&CompanyTransformer, &companies());
    assert_eq!(rows.len(), 3);

    let acme = &rows[0];
    assert_eq!(acme.id().to_string(), "1");
    assert_eq!(acme.value("employees"), &Value::from("1,200"));
    assert_eq!(acme.value("employees_raw"), &Value::Int(1200));
    assert_eq!(acme.value("contacts_raw"), &Value::Int(34));
    assert_eq!(acme.value("created"), &Value::from("Mar 4, 2024 09:15"));
    assert!(matches!(acme.value("created_raw"), Value::DateTime(_)));
    assert_eq!(acme.value("status"), &Value::from("Active"));
    assert_eq!(
        acme.searchable_text(),
        Some(
            "acme corp acme.example software 1,200 34 mar 4, 2024 09:15 active \
             1200 34 2024-03-04t09:15:00z active company"
        )
    );

    let globex = &rows[2];
    assert_eq!(globex.value("employees"), &Value::from("45,000"));
    assert_eq!(globex.value("industry"), &Value::from("—"));
}

#[test]
fn test_missing_fields_become_placeholders() {
    let rows = transform_all(&CompanyTransformer, &companies());
    let sparse = &rows[1];

    assert_eq!(sparse.id().to_string(), "c-2");
    assert_eq!(sparse.value("name"), &Value::from("—"));
    assert_eq!(sparse.value("domain"), &Value::from("—"));
    assert_eq!(sparse.value("employees"), &Value::from("—"));
    assert!(sparse.value("employees_raw").is_null());
    assert_eq!(sparse.value("created"), &Value::from("—"));
    assert!(sparse.value("created_raw").is_null());
    assert_eq!(sparse.value("status"), &Value::from("Unknown"));
    assert_eq!(sparse.searchable_text(), Some("unknown not a date company"));
}

#[test]
fn test_missing_date_renders_placeholder() {
    let record = ContactRecord {
        first_name: Some("Ada".into()),
        ..Default::default()
    };
    let rows = transform_all(&ContactTransformer, &[record]);
    let created = Dataset::Contacts
        .columns()
        .into_iter()
        .find(|c| c.key == "created")
        .unwrap();
    assert_eq!(created.render(&rows[0]).text, "—");
}

#[test]
fn test_contact_name_joins_parts() {
    let records: Vec<ContactRecord> = serde_json::from_str(
        r#"[
            {"id": 1, "first_name": "Ada", "last_name": "Lovelace", "status": "new"},
            {"id": 2, "last_name": "Hopper"},
            {"id": 3, "first_name": "  ", "email": "anon@example.com"}
        ]"#,
    )
    .unwrap();
    let rows = transform_all(&ContactTransformer, &records);

    assert_eq!(rows[0].value("name"), &Value::from("Ada Lovelace"));
    assert_eq!(rows[1].value("name"), &Value::from("Hopper"));
    assert_eq!(rows[2].value("name"), &Value::from("—"));
    assert!(rows[2].searchable_text().unwrap().contains("anon@example.com"));
    assert!(rows[0].searchable_text().unwrap().ends_with("contact"));
}

#[test]
fn test_upload_rows_keep_raw_counts() {
    let records: Vec<UploadLogRecord> = serde_json::from_str(
        r#"[{
            "id": 9,
            "file_name": "leads-march.csv",
            "uploaded_by": "sam",
            "total_rows": 15000,
            "processed_rows": 14990,
            "failed_rows": 10,
            "uploaded_at": "2024-03-31 23:59:00",
            "status": "partially_completed"
        }]"#,
    )
    .unwrap();
    let rows = transform_all(&UploadLogTransformer, &records);
    let row = &rows[0];

    assert_eq!(row.value("total"), &Value::from("15,000"));
    assert_eq!(row.value("failed_raw"), &Value::Int(10));
    assert_eq!(row.value("uploaded"), &Value::from("Mar 31, 2024 23:59"));
    assert_eq!(row.value("status"), &Value::from("Partially completed"));
    assert_eq!(
        row.searchable_text(),
        Some(
            "leads-march.csv sam 15,000 14,990 10 mar 31, 2024 23:59 partially completed \
             15000 14990 10 2024-03-31 23:59:00 partially_completed upload"
        )
    );
}

#[test]
fn test_status_column_renders_badge() {
    let rows = transform_all(&CompanyTransformer, &companies());
    let status = Dataset::Companies
        .columns()
        .into_iter()
        .find(|c| c.key == "status")
        .unwrap();

    let active = status.render(&rows[0]);
    assert_eq!(active.text, "Active");
    assert_eq!(active.tone, Some(Tone::Success));

    let churned = status.render(&rows[2]);
    assert_eq!(churned.tone, Some(Tone::Danger));
}

#[test]
fn test_every_dataset_has_sortable_columns() {
    for dataset in Dataset::ALL {
        let columns = dataset.columns();
        assert!(columns.iter().any(|c| c.sortable), "{dataset}");
        assert!(columns.iter().any(|c| c.key == "status"), "{dataset}");
    }
}

fn full_rows(dataset: Dataset) -> Vec<Row> {
    match dataset {
        Dataset::Companies => transform_all(&CompanyTransformer, &companies()[..1]),
        Dataset::Contacts => {
            let records: Vec<ContactRecord> = serde_json::from_str(
                r#"[{
                    "id": 4,
                    "first_name": "Grace",
                    "last_name": "Hopper",
                    "email": "grace@navy.example",
                    "title": "Rear Admiral",
                    "company": "US Navy",
                    "phone": "+1 555 0100",
                    "created_at": "2023-12-09T08:00:00Z",
                    "status": "lead"
                }]"#,
            )
            .unwrap();
            transform_all(&ContactTransformer, &records)
        }
        Dataset::Uploads => {
            let records: Vec<UploadLogRecord> = serde_json::from_str(
                r#"[{
                    "id": 5,
                    "file_name": "q1.csv",
                    "uploaded_by": "kim",
                    "total_rows": 2500,
                    "processed_rows": 2400,
                    "failed_rows": 100,
                    "uploaded_at": "2024-01-15T12:00:00Z",
                    "status": "failed"
                }]"#,
            )
            .unwrap();
            transform_all(&UploadLogTransformer, &records)
        }
    }
}

#[test]
fn test_every_displayed_cell_is_searchable() {
    for dataset in Dataset::ALL {
        let rows = full_rows(dataset);
        let row = &rows[0];
        let haystack = row.searchable_text().unwrap();
        for column in dataset.columns() {
            let cell = column.render(row).text.to_lowercase();
            assert!(
                haystack.contains(&cell),
                "{dataset}: `{}` cell `{cell}` missing from `{haystack}`",
                column.key
            );
        }
    }
}

#[test]
fn test_search_finds_displayed_date_count_and_raw_status() {
    let records: Vec<CompanyRecord> = serde_json::from_str(
        r#"[
            {"id": 1, "name": "Acme", "employee_count": 1200,
             "created_at": "2024-03-04T00:00:00Z", "status": "in_progress"},
            {"id": 2, "name": "Globex", "employee_count": 80,
             "created_at": "2023-07-01T00:00:00Z", "status": "active"}
        ]"#,
    )
    .unwrap();
    let mut table = DataTable::new(Dataset::Companies.columns(), Dataset::Companies.config());
    table.set_rows(transform_all(&CompanyTransformer, &records));

    for term in ["Mar 4, 2024", "1,200", "1200", "in_progress", "In progress"] {
        table.set_global_filter(term);
        let ids: Vec<String> = table.visible_rows().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["1"], "search `{term}`");
    }
}

#[test]
fn test_malformed_ids_keep_every_row() {
    let records: Vec<CompanyRecord> = serde_json::from_str(
        r#"[
            {"id": 1, "name": "Acme"},
            {"id": 2.5, "name": "Globex"},
            {"id": {"oid": 3}, "name": "Initech"},
            {"name": "Hooli"}
        ]"#,
    )
    .unwrap();
    let rows = transform_all(&CompanyTransformer, &records);
    let ids: Vec<String> = rows.iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["1", "2.5", "#2", "#3"]);
}
