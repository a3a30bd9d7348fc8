use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use etl_mysql::types::{TableName, TargetSchema};
use tokio::sync::Mutex;
use tracing::info;

use crate::destination::Destination;
use crate::error::{ErrorKind, EtlResult};
use crate::load::UpsertStatement;
use crate::types::Cell;
use crate::{bail, etl_error};

/// A stored row, keyed by column name.
pub type MemoryRow = BTreeMap<String, Cell>;

#[derive(Debug, Default)]
struct MemoryTable {
    schema: Option<TargetSchema>,
    rows: Vec<MemoryRow>,
    /// Rendered primary-key value to position in `rows`.
    keys: HashMap<String, usize>,
    next_auto_increment: i64,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<TableName, MemoryTable>,
    reference_values: HashMap<(TableName, String), String>,
    statements: Vec<UpsertStatement>,
    fail_after: Option<u64>,
    executed: u64,
}

/// In-memory destination for tests and dry runs.
///
/// [`MemoryDestination`] applies MySQL upsert semantics: a caller-supplied key that already
/// exists updates the listed columns, an auto-increment key gets the next counter value, and
/// NOT NULL columns without a default must be written. Schemas are registered up front since
/// there is nothing to introspect.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    /// Creates a new empty memory destination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, making it visible to introspection and writes.
    pub async fn add_table(&self, schema: TargetSchema) {
        let mut inner = self.inner.lock().await;
        let table = inner.tables.entry(schema.name().clone()).or_default();
        table.schema = Some(schema);
        table.next_auto_increment = 1;
    }

    /// Sets the value returned for `column` of the reference table `table`.
    pub async fn set_reference_value(
        &self,
        table: TableName,
        column: impl Into<String>,
        value: impl Into<String>,
    ) {
        let mut inner = self.inner.lock().await;
        inner
            .reference_values
            .insert((table, column.into()), value.into());
    }

    /// Makes every statement after the first `statements` fail.
    pub async fn fail_after(&self, statements: u64) {
        let mut inner = self.inner.lock().await;
        inner.fail_after = Some(statements);
        inner.executed = 0;
    }

    /// Returns a copy of the rows of `table`, in insertion order.
    pub async fn rows(&self, table: &TableName) -> Vec<MemoryRow> {
        let inner = self.inner.lock().await;
        inner
            .tables
            .get(table)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    /// Returns every statement executed successfully so far.
    pub async fn statements(&self) -> Vec<UpsertStatement> {
        let inner = self.inner.lock().await;
        inner.statements.clone()
    }
}

impl Destination for MemoryDestination {
    fn name() -> &'static str {
        "memory"
    }

    async fn introspect(&self, table: &TableName) -> EtlResult<TargetSchema> {
        let inner = self.inner.lock().await;

        match inner.tables.get(table).and_then(|table| table.schema.clone()) {
            Some(schema) => Ok(schema),
            None => bail!(
                ErrorKind::DestinationTableMissing,
                "Destination table does not exist or has no columns",
                table.to_string()
            ),
        }
    }

    async fn reference_value(&self, table: &TableName, column: &str) -> EtlResult<Option<String>> {
        let inner = self.inner.lock().await;

        Ok(inner
            .reference_values
            .get(&(table.clone(), column.to_string()))
            .cloned())
    }

    async fn write_upserts(&self, statements: Vec<UpsertStatement>) -> EtlResult<u64> {
        let mut inner = self.inner.lock().await;

        info!("writing a batch of {} upserts", statements.len());

        let mut written = 0;
        for statement in statements {
            if inner
                .fail_after
                .is_some_and(|fail_after| inner.executed >= fail_after)
            {
                bail!(
                    ErrorKind::PersistenceFailed,
                    "Upsert of a customer row failed",
                    format!(
                        "customer {} failed after {written} rows were written",
                        statement.customer_id()
                    )
                );
            }

            let table = inner.tables.get_mut(statement.table()).ok_or_else(|| {
                etl_error!(
                    ErrorKind::PersistenceFailed,
                    "Upsert targets an unknown table",
                    statement.table().to_string()
                )
            })?;
            table.apply(&statement)?;

            inner.executed += 1;
            inner.statements.push(statement);
            written += 1;
        }

        Ok(written)
    }
}

impl MemoryTable {
    fn apply(&mut self, statement: &UpsertStatement) -> EtlResult<()> {
        let Some(schema) = &self.schema else {
            bail!(
                ErrorKind::PersistenceFailed,
                "Upsert targets a table without schema",
                statement.table().to_string()
            );
        };

        for column in statement.columns() {
            if !schema.has_column(column) {
                bail!(
                    ErrorKind::PersistenceFailed,
                    "Unknown column in upsert",
                    column.clone()
                );
            }
        }

        for column in schema.required_columns() {
            if statement.value(&column.name).is_none() {
                bail!(
                    ErrorKind::PersistenceFailed,
                    "Field doesn't have a default value",
                    column.name.clone()
                );
            }
        }

        let key = schema.primary_key();
        let mut row: MemoryRow = statement
            .columns()
            .iter()
            .cloned()
            .zip(statement.values().iter().cloned())
            .collect();

        let key_value = match statement.value(&key.name) {
            Some(value) => value.clone(),
            None if key.auto_increment => {
                let value = Cell::I64(self.next_auto_increment);
                self.next_auto_increment += 1;
                row.insert(key.name.clone(), value.clone());
                value
            }
            None => bail!(
                ErrorKind::PersistenceFailed,
                "Field doesn't have a default value",
                key.name.clone()
            ),
        };

        let rendered_key = key_value.to_string();
        match self.keys.get(&rendered_key).copied() {
            Some(position) if statement.is_upsert() => {
                let existing = &mut self.rows[position];
                for column in statement.update_columns() {
                    if let Some(value) = statement.value(column) {
                        existing.insert(column.clone(), value.clone());
                    }
                }
            }
            Some(_) => bail!(
                ErrorKind::PersistenceFailed,
                "Duplicate entry for key PRIMARY",
                rendered_key
            ),
            None => {
                if let Cell::I64(value) = key_value {
                    self.next_auto_increment = self.next_auto_increment.max(value + 1);
                }
                self.keys.insert(rendered_key, self.rows.len());
                self.rows.push(row);
            }
        }

        Ok(())
    }
}
