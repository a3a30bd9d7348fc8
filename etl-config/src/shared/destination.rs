use serde::Deserialize;

use crate::shared::{MySqlConnectionConfig, ValidationError};

/// Where the consolidated customer rows are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DestinationConfig {
    /// Connection settings for the destination database.
    pub connection: MySqlConnectionConfig,
    /// The single table receiving customer rows.
    pub table: DestinationTableConfig,
}

impl DestinationConfig {
    /// Validates the connection and the table settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.connection.validate()?;
        self.table.validate()
    }
}

/// Destination table settings.
///
/// The table is chosen by whoever writes the configuration; the pipeline never guesses
/// among several candidate tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DestinationTableConfig {
    /// Name of the table receiving customer rows.
    pub name: String,
    /// Sibling table used to look up a fallback agent code.
    #[serde(default = "DestinationTableConfig::default_reference")]
    pub reference: Option<ReferenceTableConfig>,
    /// Text written where a string value is unknown.
    #[serde(default = "DestinationTableConfig::default_sentinel")]
    pub sentinel: String,
}

impl DestinationTableConfig {
    /// Default text for unknown string values.
    pub const DEFAULT_SENTINEL: &'static str = "Unknown";

    /// Creates a table config with the default reference table and sentinel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: Self::default_reference(),
            sentinel: Self::default_sentinel(),
        }
    }

    fn default_reference() -> Option<ReferenceTableConfig> {
        Some(ReferenceTableConfig::default())
    }

    fn default_sentinel() -> String {
        Self::DEFAULT_SENTINEL.to_string()
    }

    /// Validates the table settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTableName);
        }

        if let Some(reference) = &self.reference {
            reference.validate()?;
        }

        Ok(())
    }
}

/// A sibling table holding a single-column reference value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReferenceTableConfig {
    /// Reference table name.
    pub table: String,
    /// Column read from the first row of the reference table.
    pub column: String,
}

impl Default for ReferenceTableConfig {
    fn default() -> Self {
        Self {
            table: "AGENTS".to_string(),
            column: "AGENT_CODE".to_string(),
        }
    }
}

impl ReferenceTableConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.table.trim().is_empty() {
            return Err(ValidationError::ReferenceTable(
                "`table` cannot be empty".to_string(),
            ));
        }

        if self.column.trim().is_empty() {
            return Err(ValidationError::ReferenceTable(
                "`column` cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
