use etl_mysql::types::{ColumnSchema, TableName, TargetSchema};

use crate::destination::memory::{MemoryDestination, MemoryRow};
use crate::types::Cell;

/// Database holding every test table.
pub const TEST_DATABASE_SCHEMA: &str = "carinsur";

pub fn test_table_name(name: &str) -> TableName {
    TableName::new(TEST_DATABASE_SCHEMA, name)
}

fn target_schema(name: &str, columns: Vec<ColumnSchema>) -> TargetSchema {
    TargetSchema::try_new(test_table_name(name), columns).expect("Invalid test table schema")
}

/// A legacy customer table keyed by a text code, with a NOT NULL amount column.
pub fn legacy_customer_schema() -> TargetSchema {
    target_schema(
        "CUSTOMER",
        vec![
            ColumnSchema::new("CUST_CODE", "varchar(6)", 1).primary_key(),
            ColumnSchema::new("CUST_NAME", "varchar(40)", 2).not_null(),
            ColumnSchema::new("CUST_CITY", "char(35)", 3),
            ColumnSchema::new("WORKING_AREA", "varchar(35)", 4).not_null(),
            ColumnSchema::new("CUST_COUNTRY", "varchar(20)", 5).not_null(),
            ColumnSchema::new("GRADE", "int(11)", 6),
            ColumnSchema::new("OPENING_AMT", "decimal(12,2)", 7).not_null(),
            ColumnSchema::new("RECEIVE_AMT", "decimal(12,2)", 8).not_null(),
            ColumnSchema::new("PHONE_NO", "varchar(17)", 9).not_null(),
            ColumnSchema::new("AGENT_CODE", "char(6)", 10),
        ],
    )
}

/// A customer table keyed by a caller-supplied integer id.
pub fn customers_schema() -> TargetSchema {
    target_schema(
        "customers",
        vec![
            ColumnSchema::new("id", "int(11)", 1).primary_key(),
            ColumnSchema::new("first_name", "varchar(50)", 2).not_null(),
            ColumnSchema::new("last_name", "varchar(50)", 3).not_null(),
            ColumnSchema::new("postcode", "varchar(10)", 4),
            ColumnSchema::new("marital_status", "varchar(20)", 5),
            ColumnSchema::new("salary", "decimal(10,2)", 6),
            ColumnSchema::new("joined_on", "date", 7).not_null(),
            ColumnSchema::new("created_at", "timestamp", 8)
                .not_null()
                .with_default(),
        ],
    )
}

/// A customer table whose integer key is assigned by the database.
pub fn auto_increment_schema() -> TargetSchema {
    target_schema(
        "customer_accounts",
        vec![
            ColumnSchema::new("id", "bigint unsigned", 1)
                .primary_key()
                .auto_increment(),
            ColumnSchema::new("full_name", "varchar(100)", 2).not_null(),
            ColumnSchema::new("email", "varchar(100)", 3),
        ],
    )
}

/// A customer table keyed by a small integer, so large ids get clamped.
pub fn small_key_schema() -> TargetSchema {
    target_schema(
        "small_customers",
        vec![
            ColumnSchema::new("id", "tinyint unsigned", 1).primary_key(),
            ColumnSchema::new("name", "varchar(100)", 2),
        ],
    )
}

/// Creates a memory destination holding the given tables.
pub async fn memory_destination(schemas: Vec<TargetSchema>) -> MemoryDestination {
    let destination = MemoryDestination::new();
    for schema in schemas {
        destination.add_table(schema).await;
    }

    destination
}

/// Returns the row whose `column` holds `value`.
pub fn find_row<'a>(rows: &'a [MemoryRow], column: &str, value: &Cell) -> Option<&'a MemoryRow> {
    rows.iter().find(|row| row.get(column) == Some(value))
}

/// Asserts that `row` holds `expected` in `column`.
pub fn assert_cell_eq(row: &MemoryRow, column: &str, expected: &Cell) {
    assert_eq!(
        row.get(column),
        Some(expected),
        "column '{column}' mismatch: got {:?}, expected {expected:?}",
        row.get(column)
    );
}
