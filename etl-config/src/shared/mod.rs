//! Shared configuration types for the consolidation pipeline.

mod base;
mod connection;
mod consolidator;
mod destination;
mod sources;

pub use base::ValidationError;
pub use connection::{IntoConnectOptions, MySqlConnectionConfig};
pub use consolidator::ConsolidatorConfig;
pub use destination::{DestinationConfig, DestinationTableConfig, ReferenceTableConfig};
pub use sources::SourcesConfig;
