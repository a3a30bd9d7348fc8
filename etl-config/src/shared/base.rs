use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The destination host is empty.
    #[error("`destination.connection.host` cannot be empty")]
    EmptyHost,
    /// The destination port is zero.
    #[error("`destination.connection.port` cannot be zero")]
    PortZero,
    /// The destination table name is empty.
    #[error("`destination.table.name` cannot be empty")]
    EmptyTableName,
    /// The reference table or column name is empty.
    #[error("Invalid reference table config: {0}")]
    ReferenceTable(String),
    /// The customers source path is empty.
    #[error("`sources.customers` cannot be empty")]
    EmptyCustomersSource,
}
