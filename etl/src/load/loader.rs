use etl_mysql::types::{FALLBACK_KEY_RANGE, TargetSchema};
use tracing::{info, warn};

use crate::destination::Destination;
use crate::error::EtlResult;
use crate::load::row::{LoadDefaults, build_row};
use crate::load::statement::UpsertStatement;
use crate::mapping::ColumnMapping;
use crate::types::UnifiedCustomers;

/// Outcome of one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Statements executed successfully.
    pub rows_written: u64,
    /// Customers whose id fell outside the key column range and was clamped.
    pub clamped_ids: u64,
    /// Whether the destination assigned the keys itself.
    pub auto_increment: bool,
}

/// Builds one upsert per customer, in ascending id order, and writes them all.
///
/// The first failing statement aborts the pass. Rows already written stay written.
pub async fn persist<D: Destination>(
    destination: &D,
    customers: &UnifiedCustomers,
    schema: &TargetSchema,
    mapping: &ColumnMapping,
    defaults: &LoadDefaults,
) -> EtlResult<LoadReport> {
    let key = schema.primary_key();
    let range = schema.key_range().unwrap_or(FALLBACK_KEY_RANGE);
    let clamps = !key.auto_increment && key.is_numeric();

    let mut report = LoadReport {
        auto_increment: key.auto_increment,
        ..LoadReport::default()
    };

    let mut statements = Vec::with_capacity(customers.len());
    for customer in customers {
        if clamps && !range.contains(customer.id()) {
            warn!(
                customer_id = customer.id(),
                %range,
                "customer id outside the key range, clamping"
            );
            report.clamped_ids += 1;
        }

        let row = build_row(customer, schema, mapping, defaults);
        statements.push(UpsertStatement::new(customer.id(), schema, row));
    }

    info!(
        destination = D::name(),
        table = %schema.name(),
        statements = statements.len(),
        "loading unified customers"
    );

    report.rows_written = destination.write_upserts(statements).await?;

    info!(
        rows_written = report.rows_written,
        clamped_ids = report.clamped_ids,
        "load pass finished"
    );

    Ok(report)
}
