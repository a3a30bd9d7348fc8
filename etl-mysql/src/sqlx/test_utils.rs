use etl_config::shared::{IntoConnectOptions, MySqlConnectionConfig};
use sqlx::{Connection, Executor, MySqlConnection, MySqlPool};

use crate::types::quote_identifier;

/// Returns a database name that is unique for the current test.
pub fn random_database_name() -> String {
    format!("etl_test_{}", uuid::Uuid::new_v4().simple())
}

/// Creates the database named in `config` and returns a pool bound to it.
///
/// # Panics
/// Panics when the server is unreachable or the database already exists.
pub async fn create_mysql_database(config: &MySqlConnectionConfig) -> MySqlPool {
    let mut connection = MySqlConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to MySQL");

    connection
        .execute(&*format!("CREATE DATABASE {}", quote_identifier(&config.name)))
        .await
        .expect("Failed to create database");

    MySqlPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to MySQL database")
}

/// Drops the database named in `config` if it exists.
///
/// # Panics
/// Panics when the server is unreachable.
pub async fn drop_mysql_database(config: &MySqlConnectionConfig) {
    let mut connection = MySqlConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to MySQL");

    connection
        .execute(&*format!(
            "DROP DATABASE IF EXISTS {}",
            quote_identifier(&config.name)
        ))
        .await
        .expect("Failed to destroy database");
}
