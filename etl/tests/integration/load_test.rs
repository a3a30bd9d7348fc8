use etl::destination::memory::MemoryDestination;
use etl::error::ErrorKind;
use etl::load::{LoadDefaults, persist};
use etl::mapping::{CandidateList, map_columns};
use etl::resolution::EntityResolver;
use etl::test_utils::records::customer;
use etl::test_utils::schema::{
    assert_cell_eq, auto_increment_schema, customers_schema, find_row, legacy_customer_schema,
    memory_destination, small_key_schema,
};
use etl::types::{Cell, RawCustomer, UnifiedCustomers};
use etl_mysql::types::{FALLBACK_KEY_RANGE, TargetSchema};
use etl_telemetry::tracing::init_test_tracing;

fn unified(customers: Vec<RawCustomer>, schema: &TargetSchema) -> UnifiedCustomers {
    let range = schema.key_range().unwrap_or(FALLBACK_KEY_RANGE);
    EntityResolver::new(customers, range).finish().customers
}

async fn load(
    destination: &MemoryDestination,
    customers: &UnifiedCustomers,
    schema: &TargetSchema,
) -> etl::error::EtlResult<etl::load::LoadReport> {
    let mapping = map_columns(schema, &CandidateList::default());
    persist(
        destination,
        customers,
        schema,
        &mapping,
        &LoadDefaults::default(),
    )
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn persist_twice_leaves_identical_rows() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![
            customer(Some(1), "John", "Smith", Some("SW1A")),
            customer(None, "Ann", "Lee", Some("EC1")),
        ],
        &schema,
    );

    let first = load(&destination, &customers, &schema).await.unwrap();
    let rows_after_first = destination.rows(schema.name()).await;

    let second = load(&destination, &customers, &schema).await.unwrap();
    let rows_after_second = destination.rows(schema.name()).await;

    assert_eq!(first.rows_written, 2);
    assert_eq!(second.rows_written, 2);
    assert_eq!(rows_after_first.len(), 2);
    assert_eq!(rows_after_first, rows_after_second);

    let statements = destination.statements().await;
    assert_eq!(statements.len(), 4);
    assert_eq!(statements[0].sql(), statements[2].sql());
    assert_eq!(statements[0].values(), statements[2].values());
}

#[tokio::test(flavor = "multi_thread")]
async fn statements_run_in_ascending_id_order() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![
            customer(Some(30), "Cara", "Dune", None),
            customer(Some(10), "John", "Smith", None),
            customer(Some(20), "Ann", "Lee", None),
        ],
        &schema,
    );

    load(&destination, &customers, &schema).await.unwrap();

    let ids: Vec<i64> = destination
        .statements()
        .await
        .iter()
        .map(|statement| statement.customer_id())
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[tokio::test(flavor = "multi_thread")]
async fn legacy_table_gets_defaults_for_required_columns() {
    init_test_tracing();

    let schema = legacy_customer_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![RawCustomer {
            salary: Some("£42,000.50".to_string()),
            ..customer(Some(7), "jOHN", "smith", None)
        }],
        &schema,
    );

    load(&destination, &customers, &schema).await.unwrap();

    let rows = destination.rows(schema.name()).await;
    let row = find_row(&rows, "CUST_CODE", &Cell::from("7")).unwrap();
    assert_cell_eq(row, "CUST_NAME", &Cell::from("John Smith"));
    assert_cell_eq(row, "CUST_CITY", &Cell::from("Unknown"));
    assert_cell_eq(row, "WORKING_AREA", &Cell::from("Unknown"));
    assert_cell_eq(row, "CUST_COUNTRY", &Cell::from("UK"));
    assert_cell_eq(row, "GRADE", &Cell::I64(1));
    assert_cell_eq(row, "OPENING_AMT", &Cell::F64(42_000.5));
    assert_cell_eq(row, "RECEIVE_AMT", &Cell::I64(0));
    assert_cell_eq(row, "PHONE_NO", &Cell::from(""));
    assert!(!row.contains_key("AGENT_CODE"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_email_column_is_not_an_error() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![RawCustomer {
            email: Some("john@example.com".to_string()),
            ..customer(Some(1), "John", "Smith", None)
        }],
        &schema,
    );

    load(&destination, &customers, &schema).await.unwrap();

    let rows = destination.rows(schema.name()).await;
    assert_eq!(rows.len(), 1);
    assert!(
        rows[0]
            .values()
            .all(|cell| *cell != Cell::from("john@example.com"))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn auto_increment_key_is_assigned_by_destination() {
    init_test_tracing();

    let schema = auto_increment_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![
            RawCustomer {
                email: Some("john@example.com".to_string()),
                ..customer(Some(500), "John", "Smith", None)
            },
            customer(Some(900), "Ann", "Lee", None),
        ],
        &schema,
    );

    let report = load(&destination, &customers, &schema).await.unwrap();
    assert!(report.auto_increment);
    assert_eq!(report.clamped_ids, 0);

    let statements = destination.statements().await;
    assert!(statements.iter().all(|statement| !statement.is_upsert()));
    assert!(statements.iter().all(|statement| statement.value("id").is_none()));

    let rows = destination.rows(schema.name()).await;
    assert_cell_eq(&rows[0], "id", &Cell::I64(1));
    assert_cell_eq(&rows[0], "full_name", &Cell::from("John Smith"));
    assert_cell_eq(&rows[0], "email", &Cell::from("john@example.com"));
    assert_cell_eq(&rows[1], "id", &Cell::I64(2));
    assert!(!rows[1].contains_key("email"));
}

#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_ids_are_clamped() {
    init_test_tracing();

    let schema = small_key_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let customers = unified(
        vec![
            customer(Some(12), "John", "Smith", None),
            customer(Some(4_000), "Ann", "Lee", None),
        ],
        &schema,
    );

    let report = load(&destination, &customers, &schema).await.unwrap();
    assert_eq!(report.clamped_ids, 1);

    let rows = destination.rows(schema.name()).await;
    assert!(find_row(&rows, "id", &Cell::I64(12)).is_some());
    let clamped = find_row(&rows, "id", &Cell::I64(255)).unwrap();
    assert_cell_eq(clamped, "name", &Cell::from("Ann Lee"));
}

#[tokio::test(flavor = "multi_thread")]
async fn first_failed_write_aborts_the_load() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    destination.fail_after(1).await;

    let customers = unified(
        vec![
            customer(Some(1), "John", "Smith", None),
            customer(Some(2), "Ann", "Lee", None),
            customer(Some(3), "Cara", "Dune", None),
        ],
        &schema,
    );

    let err = load(&destination, &customers, &schema).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailed);

    let rows = destination.rows(schema.name()).await;
    assert_eq!(rows.len(), 1);
    assert_cell_eq(&rows[0], "id", &Cell::I64(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_table_fails_the_write() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = MemoryDestination::new();
    let customers = unified(vec![customer(Some(1), "John", "Smith", None)], &schema);

    let err = load(&destination, &customers, &schema).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailed);
    assert!(destination.statements().await.is_empty());
}
