use etl_config::load_config;
use etl_config::shared::ConsolidatorConfig;

use crate::error::{ConsolidatorError, ConsolidatorResult};

/// Loads and validates the consolidator configuration.
pub fn load_consolidator_config() -> ConsolidatorResult<ConsolidatorConfig> {
    let config = load_config::<ConsolidatorConfig>().map_err(ConsolidatorError::config)?;
    config.validate().map_err(ConsolidatorError::config)?;

    Ok(config)
}
