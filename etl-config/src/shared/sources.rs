use std::path::PathBuf;

use serde::Deserialize;

use crate::shared::ValidationError;

/// Locations of the raw record files feeding one consolidation run.
///
/// Customers are authoritative and mandatory. The dependent sources are optional; a
/// configured path that does not exist is a fatal error at extraction time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourcesConfig {
    /// JSON array or JSON-lines file with customer records.
    pub customers: PathBuf,
    /// JSON array or JSON-lines file with vehicle records.
    #[serde(default)]
    pub vehicles: Option<PathBuf>,
    /// JSON array or JSON-lines file with policy records.
    #[serde(default)]
    pub policies: Option<PathBuf>,
    /// Plain text file with one note per line.
    #[serde(default)]
    pub notes: Option<PathBuf>,
}

impl SourcesConfig {
    /// Validates the source paths.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customers.as_os_str().is_empty() {
            return Err(ValidationError::EmptyCustomersSource);
        }

        Ok(())
    }
}
