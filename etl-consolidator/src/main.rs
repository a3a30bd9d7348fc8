//! Customer consolidation service binary.
//!
//! Loads configuration, reads the raw record files, runs one consolidation pass against the
//! configured MySQL table and exits. A failed pass exits with a non-zero status.

use crate::config::load_consolidator_config;
use crate::core::start_consolidator_with_config;
use crate::error::{ConsolidatorError, ConsolidatorResult};

use etl_config::shared::ConsolidatorConfig;
use etl_telemetry::tracing::init_tracing;
use tracing::{error, info};

mod config;
mod core;
mod error;

/// Entry point for the consolidator.
///
/// Loads configuration and initializes tracing before the async runtime starts, so
/// configuration errors are reported even when logging cannot be set up.
fn main() -> ConsolidatorResult<()> {
    let consolidator_config = load_consolidator_config()?;

    let _log_flusher =
        init_tracing(env!("CARGO_BIN_NAME")).map_err(ConsolidatorError::config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(consolidator_config))?;

    Ok(())
}

async fn async_main(consolidator_config: ConsolidatorConfig) -> ConsolidatorResult<()> {
    match start_consolidator_with_config(consolidator_config).await {
        Ok(report) => {
            info!(
                unified_customers = report.unified_customers,
                rows_written = report.load.rows_written,
                "consolidator finished"
            );

            Ok(())
        }
        Err(err) => {
            error!("{err}");
            eprint!("{}", err.render_report());

            Err(err)
        }
    }
}
