use std::path::{Path, PathBuf};

use etl::error::ErrorKind;
use etl::sources::SourceRecords;
use etl_config::shared::SourcesConfig;
use etl_telemetry::tracing::init_test_tracing;

fn source_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("etl_sources_{test}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test(flavor = "multi_thread")]
async fn all_sources_are_read() {
    init_test_tracing();

    let dir = source_dir("all");
    let config = SourcesConfig {
        customers: write(
            &dir,
            "customers.json",
            r#"[{"id": 1, "first_name": "John", "last_name": "Smith", "postcode": "SW1A"}]"#,
        ),
        vehicles: Some(write(
            &dir,
            "vehicles.jsonl",
            "{\"first\": \"john\", \"last\": \"smith\", \"model\": \"Civic\", \"year\": 2019}\n\
             oops\n",
        )),
        policies: Some(write(
            &dir,
            "policies.json",
            r#"[{"first": "ann", "last": "lee", "postcode": "EC1", "start": "2024-01-01",
                 "end": "2024-12-31", "payment": 120.0, "freq": "Monthly"}]"#,
        )),
        notes: Some(write(&dir, "notes.txt", "John Smith called\n\n")),
    };

    let records = SourceRecords::load(&config).await.unwrap();

    assert_eq!(records.customers.len(), 1);
    assert_eq!(records.vehicles.len(), 1);
    assert_eq!(records.policies.len(), 1);
    assert_eq!(records.policies[0].monthly_payment.as_deref(), Some("120"));
    assert_eq!(records.notes.len(), 1);
    assert_eq!(records.malformed, 1);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn optional_sources_can_be_omitted() {
    init_test_tracing();

    let dir = source_dir("optional");
    let config = SourcesConfig {
        customers: write(&dir, "customers.json", "[]"),
        vehicles: None,
        policies: None,
        notes: None,
    };

    let records = SourceRecords::load(&config).await.unwrap();
    assert_eq!(records, SourceRecords::default());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn every_missing_source_is_reported() {
    init_test_tracing();

    let dir = source_dir("missing");
    let config = SourcesConfig {
        customers: dir.join("customers.json"),
        vehicles: Some(dir.join("vehicles.json")),
        policies: None,
        notes: Some(write(&dir, "notes.txt", "John Smith called")),
    };

    let err = SourceRecords::load(&config).await.unwrap_err();
    assert_eq!(
        err.kinds(),
        vec![ErrorKind::SourceMissing, ErrorKind::SourceMissing]
    );

    std::fs::remove_dir_all(dir).unwrap();
}
