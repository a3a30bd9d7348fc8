//! Destination schema introspection.
//!
//! Reads column metadata from `information_schema` so the loader can adapt to whatever
//! table layout the destination database has.

use sqlx::{MySqlConnection, Row};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{ColumnSchema, TableName, TargetSchema, quote_identifier};

/// Errors that can occur during schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Table {0} not found or has no columns")]
    TableNotFound(String),

    #[error("Table {0} has no primary key")]
    MissingPrimaryKey(String),

    #[error("Invalid schema data: {0}")]
    InvalidData(String),
}

/// Retrieves the schema of the destination table.
///
/// Fails with [`SchemaError::TableNotFound`] when the table has no columns and with
/// [`SchemaError::MissingPrimaryKey`] when no column is part of the primary key.
pub async fn get_target_schema(
    connection: &mut MySqlConnection,
    table_name: &TableName,
) -> Result<TargetSchema, SchemaError> {
    let columns = get_table_columns(connection, table_name).await?;

    debug!(table = %table_name, columns = columns.len(), "introspected destination table");

    TargetSchema::try_new(table_name.clone(), columns)
}

async fn get_table_columns(
    connection: &mut MySqlConnection,
    table_name: &TableName,
) -> Result<Vec<ColumnSchema>, SchemaError> {
    let query = r#"
        SELECT
            CAST(c.column_name AS CHAR) AS column_name,
            CAST(c.column_type AS CHAR) AS column_type,
            CAST(c.is_nullable AS CHAR) AS is_nullable,
            CAST(c.column_default IS NOT NULL AS SIGNED) AS has_default,
            CAST(c.extra AS CHAR) AS extra,
            CAST(c.column_key AS CHAR) AS column_key,
            CAST(c.ordinal_position AS SIGNED) AS ordinal_position
        FROM information_schema.columns c
        WHERE c.table_schema = ?
        AND c.table_name = ?
        ORDER BY c.ordinal_position
    "#;

    let rows = sqlx::query(query)
        .bind(&table_name.schema)
        .bind(&table_name.name)
        .fetch_all(&mut *connection)
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("column_name")?;
        let typ: String = row.try_get("column_type")?;
        let is_nullable: String = row.try_get("is_nullable")?;
        let has_default: i64 = row.try_get("has_default")?;
        let extra: Option<String> = row.try_get("extra")?;
        let column_key: Option<String> = row.try_get("column_key")?;
        let ordinal_position: i64 = row.try_get("ordinal_position")?;

        let ordinal_position = u32::try_from(ordinal_position).map_err(|_| {
            SchemaError::InvalidData(format!(
                "column {name} has ordinal position {ordinal_position}"
            ))
        })?;

        columns.push(ColumnSchema {
            name,
            typ,
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
            has_default: has_default != 0,
            auto_increment: extra
                .is_some_and(|extra| extra.to_ascii_lowercase().contains("auto_increment")),
            primary: column_key.is_some_and(|key| key.eq_ignore_ascii_case("PRI")),
            ordinal_position,
        });
    }

    Ok(columns)
}

/// Reads the first value of `column` in the sibling table `table`.
///
/// Returns `None` when the table does not exist, is empty or the value is NULL. A failing
/// lookup is logged and treated as absent since the value only enriches rows.
pub async fn get_reference_value(
    connection: &mut MySqlConnection,
    schema: &str,
    table: &str,
    column: &str,
) -> Result<Option<String>, SchemaError> {
    let exists: i64 = sqlx::query_scalar(
        r#"
        SELECT CAST(COUNT(*) AS SIGNED)
        FROM information_schema.tables
        WHERE table_schema = ?
        AND table_name = ?
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_one(&mut *connection)
    .await?;

    if exists == 0 {
        debug!(table, "reference table does not exist");
        return Ok(None);
    }

    let query = format!(
        "SELECT CAST({} AS CHAR) FROM {}.{} LIMIT 1",
        quote_identifier(column),
        quote_identifier(schema),
        quote_identifier(table)
    );

    match sqlx::query_scalar::<_, Option<String>>(&query)
        .fetch_optional(&mut *connection)
        .await
    {
        Ok(value) => Ok(value.flatten()),
        Err(err) => {
            warn!(table, column, error = %err, "failed to read reference value");
            Ok(None)
        }
    }
}
