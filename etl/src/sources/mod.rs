//! Readers for the raw record files fed into a consolidation run.

mod json;
mod notes;

use std::path::Path;

use etl_config::shared::SourcesConfig;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{EtlError, EtlResult};
use crate::types::{NoteLine, RawCustomer, RawPolicy, RawVehicle};

pub use json::{SourceBatch, parse_records, read_records};
pub use notes::{parse_notes, read_notes};

/// Every raw record of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecords {
    pub customers: Vec<RawCustomer>,
    pub vehicles: Vec<RawVehicle>,
    pub policies: Vec<RawPolicy>,
    pub notes: Vec<NoteLine>,
    /// Records skipped while reading because they could not be deserialized.
    pub malformed: u64,
}

impl SourceRecords {
    /// Reads every configured source.
    ///
    /// All files are read even when one fails, so a run reports every missing or unreadable
    /// source at once.
    pub async fn load(config: &SourcesConfig) -> EtlResult<Self> {
        let mut records = SourceRecords::default();
        let mut errors: Vec<EtlError> = Vec::new();

        match read_records(&config.customers).await {
            Ok(batch) => records.customers = records.take(batch),
            Err(err) => errors.push(err),
        }

        match read_optional(config.vehicles.as_deref()).await {
            Ok(batch) => records.vehicles = records.take(batch),
            Err(err) => errors.push(err),
        }

        match read_optional(config.policies.as_deref()).await {
            Ok(batch) => records.policies = records.take(batch),
            Err(err) => errors.push(err),
        }

        if let Some(path) = config.notes.as_deref() {
            match read_notes(path).await {
                Ok(notes) => records.notes = notes,
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        info!(
            customers = records.customers.len(),
            vehicles = records.vehicles.len(),
            policies = records.policies.len(),
            notes = records.notes.len(),
            malformed = records.malformed,
            "sources loaded"
        );

        Ok(records)
    }

    fn take<T>(&mut self, batch: SourceBatch<T>) -> Vec<T> {
        self.malformed += batch.malformed;
        batch.records
    }
}

async fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> EtlResult<SourceBatch<T>> {
    match path {
        Some(path) => read_records(path).await,
        None => Ok(SourceBatch::default()),
    }
}
