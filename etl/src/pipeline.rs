use etl_config::shared::{DestinationTableConfig, ReferenceTableConfig};
use etl_mysql::types::{FALLBACK_KEY_RANGE, TableName};
use tracing::{debug, info, warn};

use crate::destination::Destination;
use crate::error::EtlResult;
use crate::load::{LoadDefaults, LoadReport, persist};
use crate::mapping::{Attribute, CandidateList, map_columns};
use crate::resolution::{EntityResolver, ResolutionStats};
use crate::sources::SourceRecords;

/// Counts describing one consolidation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidationReport {
    /// Unified customer records produced by resolution.
    pub unified_customers: u64,
    pub resolution: ResolutionStats,
    pub load: LoadReport,
    /// Attributes that found a destination column.
    pub mapped_attributes: u64,
    /// Whether an agent code was read from the reference table.
    pub agent_code_found: bool,
}

impl ConsolidationReport {
    pub fn log(&self) {
        info!(
            unified_customers = self.unified_customers,
            mapped_attributes = self.mapped_attributes,
            agent_code_found = self.agent_code_found,
            rows_written = self.load.rows_written,
            clamped_ids = self.load.clamped_ids,
            auto_increment = self.load.auto_increment,
            "consolidation completed"
        );
    }
}

/// One consolidation pass: introspect, resolve, map, load.
#[derive(Debug)]
pub struct ConsolidationPipeline<D> {
    destination: D,
    table: TableName,
    reference: Option<ReferenceTableConfig>,
    sentinel: String,
    candidates: CandidateList,
}

impl<D> ConsolidationPipeline<D>
where
    D: Destination,
{
    pub fn new(destination: D, table: TableName) -> Self {
        Self {
            destination,
            table,
            reference: None,
            sentinel: LoadDefaults::DEFAULT_SENTINEL.to_string(),
            candidates: CandidateList::default(),
        }
    }

    /// Creates a pipeline writing into the configured table of `database`.
    pub fn from_config(destination: D, database: &str, config: &DestinationTableConfig) -> Self {
        Self {
            destination,
            table: TableName::new(database, config.name.as_str()),
            reference: config.reference.clone(),
            sentinel: config.sentinel.clone(),
            candidates: CandidateList::default(),
        }
    }

    pub fn with_candidates(mut self, candidates: CandidateList) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_reference(mut self, reference: Option<ReferenceTableConfig>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Runs one pass over `records`.
    ///
    /// Schema problems abort before anything is written. A failed write aborts the load and
    /// leaves earlier rows in place.
    pub async fn run(&self, records: SourceRecords) -> EtlResult<ConsolidationReport> {
        info!(
            destination = D::name(),
            table = %self.table,
            "starting consolidation"
        );

        // We introspect first since surrogate ids are drawn from the key column range.
        let schema = self.destination.introspect(&self.table).await?;
        let key_range = schema.key_range().unwrap_or(FALLBACK_KEY_RANGE);

        let SourceRecords {
            customers,
            vehicles,
            policies,
            notes,
            malformed,
        } = records;
        if malformed > 0 {
            warn!(malformed, "some source records were malformed and skipped");
        }

        let mut resolver = EntityResolver::new(customers, key_range);
        resolver.resolve_vehicles(vehicles);
        resolver.resolve_policies(policies);
        resolver.attach_notes(&notes);
        let resolution = resolver.finish();

        let mapping = map_columns(&schema, &self.candidates);

        let agent_code = match (&self.reference, mapping.is_mapped(Attribute::AgentCode)) {
            (Some(reference), true) => {
                let table = TableName::new(self.table.schema.as_str(), reference.table.as_str());
                self.destination
                    .reference_value(&table, &reference.column)
                    .await?
            }
            _ => None,
        };
        debug!(agent_code = ?agent_code, "resolved agent code");

        let defaults = LoadDefaults::default()
            .with_sentinel(self.sentinel.as_str())
            .with_agent_code(agent_code.clone());

        let load = persist(
            &self.destination,
            &resolution.customers,
            &schema,
            &mapping,
            &defaults,
        )
        .await?;

        let report = ConsolidationReport {
            unified_customers: resolution.customers.len() as u64,
            resolution: resolution.stats,
            load,
            mapped_attributes: mapping.len() as u64,
            agent_code_found: agent_code.is_some(),
        };
        report.log();

        Ok(report)
    }
}
