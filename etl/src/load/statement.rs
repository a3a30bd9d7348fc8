use etl_mysql::types::{TableName, TargetSchema, quote_identifier};

use crate::types::Cell;

/// One parameterized `INSERT ... ON DUPLICATE KEY UPDATE` for a single customer.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertStatement {
    table: TableName,
    customer_id: i64,
    columns: Vec<String>,
    values: Vec<Cell>,
    update_columns: Vec<String>,
}

impl UpsertStatement {
    /// Builds the statement for a row produced by [`crate::load::build_row`].
    ///
    /// When MySQL assigns the key the statement is a plain insert. Otherwise every written
    /// non-key column is refreshed on a key collision.
    pub fn new(customer_id: i64, schema: &TargetSchema, row: Vec<(String, Cell)>) -> Self {
        let key = schema.primary_key();
        let (columns, values): (Vec<String>, Vec<Cell>) = row.into_iter().unzip();

        let update_columns = if key.auto_increment {
            Vec::new()
        } else {
            let non_key: Vec<String> = columns
                .iter()
                .filter(|column| **column != key.name)
                .cloned()
                .collect();

            // A key-only row still needs a valid update clause.
            if non_key.is_empty() {
                vec![key.name.clone()]
            } else {
                non_key
            }
        };

        Self {
            table: schema.name().clone(),
            customer_id,
            columns,
            values,
            update_columns,
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// The id of the customer this statement writes.
    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Bind values, one per column.
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Columns refreshed when the key already exists. Empty for plain inserts.
    pub fn update_columns(&self) -> &[String] {
        &self.update_columns
    }

    pub fn is_upsert(&self) -> bool {
        !self.update_columns.is_empty()
    }

    /// Returns the value written to `column`.
    pub fn value(&self, column: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &self.values[index])
    }

    /// Renders the SQL text with `?` placeholders.
    pub fn sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| quote_identifier(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; self.columns.len()].join(", ");

        let mut sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            self.table.as_quoted_identifier()
        );

        if self.is_upsert() {
            let updates = self
                .update_columns
                .iter()
                .map(|column| {
                    // `VALUES()` is deprecated on MySQL 8.0.20+, but the row alias form
                    // (`AS new ... col=new.col`) is rejected by MariaDB and MySQL < 8.0.19.
                    let column = quote_identifier(column);
                    format!("{column}=VALUES({column})")
                })
                .collect::<Vec<_>>()
                .join(", ");

            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(&updates);
        }

        sql
    }
}
