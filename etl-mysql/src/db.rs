use etl_config::shared::{IntoConnectOptions, MySqlConnectionConfig};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

/// Connects to the destination database with a connection pool.
///
/// The pool eagerly opens one connection so unreachable servers and bad credentials surface
/// before any source data is processed.
pub async fn connect_to_destination_database(
    config: &MySqlConnectionConfig,
) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .min_connections(1)
        .max_connections(config.max_connections.max(1))
        .connect_with(config.with_db())
        .await?;

    Ok(pool)
}
