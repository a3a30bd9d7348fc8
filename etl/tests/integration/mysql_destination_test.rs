use std::env;

use etl::destination::Destination;
use etl::destination::mysql::MySqlDestination;
use etl::error::ErrorKind;
use etl::pipeline::ConsolidationPipeline;
use etl::sources::SourceRecords;
use etl::test_utils::records::{customer, policy};
use etl_config::shared::{DestinationTableConfig, MySqlConnectionConfig};
use etl_mysql::sqlx::test_utils::{create_mysql_database, drop_mysql_database, random_database_name};
use etl_mysql::types::TableName;
use etl_telemetry::tracing::init_test_tracing;
use sqlx::{MySqlPool, Row};

fn test_connection_config() -> MySqlConnectionConfig {
    MySqlConnectionConfig {
        host: env::var("TESTS_MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("TESTS_MYSQL_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(MySqlConnectionConfig::DEFAULT_PORT),
        name: random_database_name(),
        username: env::var("TESTS_MYSQL_USERNAME").unwrap_or_else(|_| "root".to_string()),
        password: env::var("TESTS_MYSQL_PASSWORD").ok().map(Into::into),
        max_connections: MySqlConnectionConfig::DEFAULT_MAX_CONNECTIONS,
    }
}

async fn create_customer_table(pool: &MySqlPool) {
    sqlx::query(
        "CREATE TABLE CUSTOMER (
            CUST_CODE int(11) NOT NULL,
            CUST_NAME varchar(40) NOT NULL,
            CUST_CITY char(35),
            WORKING_AREA varchar(35) NOT NULL,
            CUST_COUNTRY varchar(20) NOT NULL,
            GRADE int(11),
            OPENING_AMT decimal(12,2) NOT NULL,
            RECEIVE_AMT decimal(12,2) NOT NULL,
            PHONE_NO varchar(17) NOT NULL,
            AGENT_CODE char(6),
            PRIMARY KEY (CUST_CODE)
        )",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("CREATE TABLE AGENTS (AGENT_CODE char(6) NOT NULL PRIMARY KEY)")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO AGENTS (AGENT_CODE) VALUES ('A003')")
        .execute(pool)
        .await
        .unwrap();
}

#[ignore]
#[tokio::test(flavor = "multi_thread")]
async fn introspection_reads_the_table_layout() {
    init_test_tracing();

    let config = test_connection_config();
    let pool = create_mysql_database(&config).await;
    create_customer_table(&pool).await;

    let destination = MySqlDestination::new(pool.clone());
    let schema = destination
        .introspect(&TableName::new(config.name.as_str(), "CUSTOMER"))
        .await
        .unwrap();

    assert_eq!(schema.num_columns(), 10);
    assert_eq!(schema.primary_key().name, "CUST_CODE");
    assert_eq!(schema.key_range().unwrap().max(), 2_147_483_647);

    let required: Vec<&str> = schema
        .required_columns()
        .map(|column| column.name.as_str())
        .collect();
    assert_eq!(
        required,
        [
            "CUST_NAME",
            "WORKING_AREA",
            "CUST_COUNTRY",
            "OPENING_AMT",
            "RECEIVE_AMT",
            "PHONE_NO"
        ]
    );

    let err = destination
        .introspect(&TableName::new(config.name.as_str(), "MISSING"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DestinationTableMissing);

    pool.close().await;
    drop_mysql_database(&config).await;
}

#[ignore]
#[tokio::test(flavor = "multi_thread")]
async fn pipeline_upserts_into_mysql() {
    init_test_tracing();

    let config = test_connection_config();
    let pool = create_mysql_database(&config).await;
    create_customer_table(&pool).await;

    let destination = MySqlDestination::new(pool.clone());
    let pipeline = ConsolidationPipeline::from_config(
        destination,
        &config.name,
        &DestinationTableConfig::new("CUSTOMER"),
    );

    let records = || SourceRecords {
        customers: vec![customer(Some(1), "John", "Smith", Some("SW1A"))],
        policies: vec![policy("Ann", "Lee", Some("EC1"), "120.0")],
        ..SourceRecords::default()
    };

    let report = pipeline.run(records()).await.unwrap();
    assert_eq!(report.load.rows_written, 2);
    assert!(report.agent_code_found);

    // Running again updates the same rows.
    pipeline.run(records()).await.unwrap();

    let rows =
        sqlx::query("SELECT CUST_CODE, CUST_NAME, AGENT_CODE FROM CUSTOMER ORDER BY CUST_CODE")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows.len(), 2);

    let first: (i32, String, String) = (rows[0].get(0), rows[0].get(1), rows[0].get(2));
    assert_eq!(first, (1, "John Smith".to_string(), "A003".to_string()));

    pool.close().await;
    drop_mysql_database(&config).await;
}
