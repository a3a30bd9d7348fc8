use serde::Deserialize;

use crate::Config;
use crate::shared::{DestinationConfig, SourcesConfig, ValidationError};

/// Top level configuration of the consolidator service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConsolidatorConfig {
    /// Destination database and table.
    pub destination: DestinationConfig,
    /// Raw record sources.
    pub sources: SourcesConfig,
}

impl ConsolidatorConfig {
    /// Validates the whole configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.destination.validate()?;
        self.sources.validate()
    }
}

impl Config for ConsolidatorConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}
