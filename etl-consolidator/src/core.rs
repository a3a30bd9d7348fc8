use etl::destination::mysql::MySqlDestination;
use etl::error::EtlError;
use etl::pipeline::{ConsolidationPipeline, ConsolidationReport};
use etl::sources::SourceRecords;
use etl_config::shared::{
    ConsolidatorConfig, DestinationTableConfig, MySqlConnectionConfig, SourcesConfig,
};
use etl_mysql::db::connect_to_destination_database;
use tracing::{debug, info};

use crate::error::ConsolidatorResult;

/// Runs one consolidation pass with the provided configuration.
///
/// Sources are read before connecting, so missing files fail fast without touching the
/// destination. The pool is closed on every exit path.
pub async fn start_consolidator_with_config(
    consolidator_config: ConsolidatorConfig,
) -> ConsolidatorResult<ConsolidationReport> {
    info!("starting consolidator service");

    log_config(&consolidator_config);

    let records = SourceRecords::load(&consolidator_config.sources).await?;

    let connection = &consolidator_config.destination.connection;
    let pool = connect_to_destination_database(connection)
        .await
        .map_err(EtlError::from)?;

    let destination = MySqlDestination::new(pool.clone());
    let pipeline = ConsolidationPipeline::from_config(
        destination,
        &connection.name,
        &consolidator_config.destination.table,
    );

    let result = pipeline.run(records).await;
    pool.close().await;

    Ok(result?)
}

fn log_config(config: &ConsolidatorConfig) {
    log_connection_config(&config.destination.connection);
    log_table_config(&config.destination.table);
    log_sources_config(&config.sources);
}

fn log_connection_config(config: &MySqlConnectionConfig) {
    debug!(
        host = config.host,
        port = config.port,
        dbname = config.name,
        username = config.username,
        max_connections = config.max_connections,
        "destination mysql connection config",
    );
}

fn log_table_config(config: &DestinationTableConfig) {
    debug!(
        table = config.name,
        reference_table = config.reference.as_ref().map(|reference| reference.table.as_str()),
        sentinel = config.sentinel,
        "destination table config",
    );
}

fn log_sources_config(config: &SourcesConfig) {
    debug!(
        customers = %config.customers.display(),
        vehicles = ?config.vehicles,
        policies = ?config.policies,
        notes = ?config.notes,
        "sources config",
    );
}
