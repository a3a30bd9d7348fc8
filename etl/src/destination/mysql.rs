use etl_mysql::schema::{get_reference_value, get_target_schema};
use etl_mysql::types::{TableName, TargetSchema};
use sqlx::MySqlPool;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use tracing::{debug, error, info};

use crate::bail;
use crate::destination::Destination;
use crate::error::{ErrorKind, EtlResult};
use crate::load::UpsertStatement;
use crate::types::Cell;

/// Destination writing into a MySQL-compatible database.
///
/// Every call acquires its own pooled connection and releases it when done, whether it
/// succeeded or not.
#[derive(Debug, Clone)]
pub struct MySqlDestination {
    pool: MySqlPool,
}

impl MySqlDestination {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl Destination for MySqlDestination {
    fn name() -> &'static str {
        "mysql"
    }

    async fn introspect(&self, table: &TableName) -> EtlResult<TargetSchema> {
        let mut connection = self.pool.acquire().await?;
        let schema = get_target_schema(&mut connection, table).await?;

        info!(
            table = %table,
            columns = schema.num_columns(),
            primary_key = %schema.primary_key().name,
            "destination table introspected"
        );

        Ok(schema)
    }

    async fn reference_value(
        &self,
        table: &TableName,
        column: &str,
    ) -> EtlResult<Option<String>> {
        let mut connection = self.pool.acquire().await?;
        let value =
            get_reference_value(&mut connection, &table.schema, &table.name, column).await?;

        debug!(
            table = %table,
            column,
            found = value.is_some(),
            "reference value looked up"
        );

        Ok(value)
    }

    async fn write_upserts(&self, statements: Vec<UpsertStatement>) -> EtlResult<u64> {
        let mut connection = self.pool.acquire().await?;
        let mut written = 0;

        for statement in &statements {
            let sql = statement.sql();
            let query = statement
                .values()
                .iter()
                .fold(sqlx::query(&sql), bind_cell);

            if let Err(err) = query.execute(&mut *connection).await {
                error!(
                    customer_id = statement.customer_id(),
                    written,
                    error = %err,
                    "upsert failed, aborting load"
                );

                bail!(
                    ErrorKind::PersistenceFailed,
                    "Upsert of a customer row failed",
                    detail = format!(
                        "customer {} failed after {written} rows were written",
                        statement.customer_id()
                    ),
                    source: err
                );
            }

            written += 1;
        }

        Ok(written)
    }
}

fn bind_cell<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    cell: &'q Cell,
) -> Query<'q, MySql, MySqlArguments> {
    match cell {
        Cell::Null => query.bind(None::<String>),
        Cell::I64(value) => query.bind(*value),
        Cell::F64(value) => query.bind(*value),
        Cell::String(value) => query.bind(value.as_str()),
        Cell::Date(value) => query.bind(*value),
    }
}
