use chrono::NaiveDate;
use etl::error::ErrorKind;
use etl::mapping::{Attribute, CandidateList};
use etl::pipeline::ConsolidationPipeline;
use etl::resolution::{EntityResolver, MatchTier};
use etl::sources::SourceRecords;
use etl::test_utils::records::{customer, policy, vehicle};
use etl::test_utils::schema::{
    TEST_DATABASE_SCHEMA, assert_cell_eq, customers_schema, find_row, legacy_customer_schema,
    memory_destination, test_table_name,
};
use etl::types::{Cell, NoteLine, RawCustomer, RawPolicy, RawVehicle};
use etl_config::shared::{DestinationTableConfig, ReferenceTableConfig};
use etl_mysql::types::{ColumnSchema, TargetSchema, integer_range};
use etl_telemetry::tracing::init_test_tracing;

fn example_records() -> SourceRecords {
    SourceRecords {
        customers: vec![customer(Some(1), "John", "Smith", Some("SW1A"))],
        vehicles: vec![RawVehicle {
            first: Some("john".to_string()),
            last: Some("smith".to_string()),
            model: Some("Civic".to_string()),
            year: Some(2019),
            ..RawVehicle::default()
        }],
        policies: vec![policy("ann", "lee", Some("EC1"), "120.0")],
        ..SourceRecords::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn end_to_end_consolidation() {
    init_test_tracing();

    let records = example_records();

    let mut resolver = EntityResolver::new(records.customers.clone(), integer_range("int(11)"));
    resolver.resolve_vehicles(records.vehicles.clone());
    resolver.resolve_policies(records.policies.clone());
    let resolution = resolver.finish();

    assert_eq!(resolution.customers.len(), 2);

    let john = resolution.customers.get(1).unwrap();
    assert_eq!(john.vehicles.len(), 1);
    assert_eq!(john.vehicles[0].model.as_deref(), Some("Civic"));
    assert_eq!(john.vehicles[0].year, Some(2019));
    assert!(john.policies.is_empty());

    let ann = resolution
        .customers
        .iter()
        .find(|customer| customer.is_placeholder())
        .unwrap();
    assert_ne!(ann.id(), 1);
    assert!(ann.vehicles.is_empty());
    assert_eq!(ann.policies.len(), 1);
    assert_eq!(ann.policies[0].monthly_payment, Some(120.0));
    assert_eq!(ann.policies[0].frequency.as_deref(), Some("Monthly"));
    assert_eq!(
        ann.policies[0].start_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let pipeline = ConsolidationPipeline::new(destination.clone(), schema.name().clone());

    let report = pipeline.run(records).await.unwrap();

    assert_eq!(report.unified_customers, 2);
    assert_eq!(report.resolution.customers_indexed, 1);
    assert_eq!(report.resolution.vehicles_attached, 1);
    assert_eq!(report.resolution.policies_attached, 1);
    assert_eq!(report.resolution.placeholder_customers, 1);
    assert_eq!(report.load.rows_written, 2);

    let rows = destination.rows(schema.name()).await;
    let john = find_row(&rows, "id", &Cell::I64(1)).unwrap();
    assert_cell_eq(john, "first_name", &Cell::from("John"));
    assert_cell_eq(john, "postcode", &Cell::from("SW1A"));

    let ann = find_row(&rows, "id", &Cell::I64(ann.id())).unwrap();
    assert_cell_eq(ann, "first_name", &Cell::from("Ann"));
    assert_cell_eq(ann, "last_name", &Cell::from("Lee"));
    assert_cell_eq(ann, "postcode", &Cell::from("EC1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn matches_fall_back_from_exact_to_relaxed() {
    init_test_tracing();

    let mut resolver = EntityResolver::new(
        vec![customer(Some(1), "John", "Smith", Some("SW1A"))],
        integer_range("int(11)"),
    );

    assert_eq!(
        resolver.resolve_vehicle(vehicle("john", "SMITH", Some("sw1a"), "Civic", 2019)),
        Some(1)
    );
    assert_eq!(
        resolver.resolve_vehicle(vehicle("john", "smith", None, "Golf", 2015)),
        Some(1)
    );

    let stats = resolver.stats();
    assert_eq!(stats.matches(MatchTier::Exact), 1);
    assert_eq!(stats.matches(MatchTier::Relaxed), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unmatched_vehicle_is_dropped() {
    init_test_tracing();

    let mut resolver = EntityResolver::new(
        vec![customer(Some(1), "John", "Smith", Some("SW1A"))],
        integer_range("int(11)"),
    );

    assert_eq!(
        resolver.resolve_vehicle(vehicle("Zed", "Nobody", None, "Civic", 2019)),
        None
    );
    assert_eq!(resolver.customers().len(), 1);
    assert_eq!(resolver.stats().unmatched_vehicles, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn policies_for_the_same_unknown_holder_share_one_placeholder() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let pipeline = ConsolidationPipeline::new(destination.clone(), schema.name().clone());

    let records = SourceRecords {
        policies: vec![
            policy("Ann", "Lee", Some("EC1"), "£120.00"),
            policy("ann", "LEE", Some("ec1"), "£80.00"),
            RawPolicy {
                start_date: Some("not a date".to_string()),
                ..policy("Ann", "Lee", Some("EC1"), "£10.00")
            },
        ],
        ..SourceRecords::default()
    };

    let report = pipeline.run(records).await.unwrap();

    assert_eq!(report.unified_customers, 1);
    assert_eq!(report.resolution.placeholder_customers, 1);
    assert_eq!(report.resolution.policies_attached, 2);
    assert_eq!(report.resolution.skipped_policies, 1);
    assert_eq!(destination.rows(schema.name()).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn notes_fan_out_to_every_matching_customer() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let pipeline = ConsolidationPipeline::new(destination, schema.name().clone());

    let records = SourceRecords {
        customers: vec![
            customer(Some(1), "John", "Smith", Some("SW1A")),
            customer(Some(2), "John", "Smith", Some("M1")),
            customer(Some(3), "Ann", "Lee", None),
        ],
        notes: vec![
            NoteLine::new("Called JOHN SMITH about his renewal."),
            NoteLine::new("Ann Lee and John Smith share an address"),
            NoteLine::new("Johnny Smithers rang"),
        ],
        ..SourceRecords::default()
    };

    let report = pipeline.run(records).await.unwrap();

    assert_eq!(report.resolution.notes_attached, 5);
    assert_eq!(report.resolution.unattached_notes, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn reference_agent_code_is_written_when_present() {
    init_test_tracing();

    let schema = legacy_customer_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    destination
        .set_reference_value(test_table_name("AGENTS"), "AGENT_CODE", "A003")
        .await;

    let config = DestinationTableConfig::new("CUSTOMER");
    let pipeline =
        ConsolidationPipeline::from_config(destination.clone(), TEST_DATABASE_SCHEMA, &config);

    let records = SourceRecords {
        customers: vec![customer(Some(1), "John", "Smith", None)],
        ..SourceRecords::default()
    };
    let report = pipeline.run(records).await.unwrap();
    assert!(report.agent_code_found);

    let rows = destination.rows(schema.name()).await;
    assert_cell_eq(&rows[0], "AGENT_CODE", &Cell::from("A003"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_reference_table_omits_agent_code() {
    init_test_tracing();

    let schema = legacy_customer_schema();
    let destination = memory_destination(vec![schema.clone()]).await;

    let pipeline = ConsolidationPipeline::new(destination.clone(), schema.name().clone())
        .with_reference(Some(ReferenceTableConfig::default()))
        .with_sentinel("N/A");

    let records = SourceRecords {
        customers: vec![customer(Some(1), "John", "Smith", None)],
        ..SourceRecords::default()
    };
    let report = pipeline.run(records).await.unwrap();
    assert!(!report.agent_code_found);

    let rows = destination.rows(schema.name()).await;
    assert!(!rows[0].contains_key("AGENT_CODE"));
    assert_cell_eq(&rows[0], "WORKING_AREA", &Cell::from("N/A"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_table_aborts_before_any_write() {
    init_test_tracing();

    let destination = memory_destination(vec![]).await;
    let pipeline = ConsolidationPipeline::new(destination.clone(), test_table_name("CUSTOMER"));

    let err = pipeline.run(example_records()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DestinationTableMissing);
    assert!(destination.statements().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn rerunning_the_pipeline_is_idempotent() {
    init_test_tracing();

    let schema = customers_schema();
    let destination = memory_destination(vec![schema.clone()]).await;
    let pipeline = ConsolidationPipeline::new(destination.clone(), schema.name().clone());

    pipeline.run(example_records()).await.unwrap();
    let first = destination.rows(schema.name()).await;

    pipeline.run(example_records()).await.unwrap();
    let second = destination.rows(schema.name()).await;

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_candidates_reach_unusual_columns() {
    init_test_tracing();

    let schema = TargetSchema::try_new(
        test_table_name("clients"),
        vec![
            ColumnSchema::new("client_id", "int(11)", 1).primary_key(),
            ColumnSchema::new("ContactEmail", "varchar(100)", 2),
        ],
    )
    .unwrap();
    let destination = memory_destination(vec![schema.clone()]).await;

    let pipeline = ConsolidationPipeline::new(destination, schema.name().clone())
        .with_candidates(CandidateList::default().with(Attribute::Email, ["ContactEmail"]));

    let records = SourceRecords {
        customers: vec![RawCustomer {
            email: Some("ann@example.com".to_string()),
            ..customer(Some(4), "Ann", "Lee", None)
        }],
        ..SourceRecords::default()
    };
    let report = pipeline.run(records).await.unwrap();
    assert_eq!(report.mapped_attributes, 1);

    let rows = pipeline.destination().rows(pipeline.table()).await;
    assert_cell_eq(&rows[0], "ContactEmail", &Cell::from("ann@example.com"));
}
