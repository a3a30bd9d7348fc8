use std::future::Future;

use etl_mysql::types::{TableName, TargetSchema};

use crate::error::EtlResult;
use crate::load::UpsertStatement;

/// Trait for systems that receive consolidated customer rows.
///
/// A destination exposes exactly one table per run. It never creates or alters tables; the
/// pipeline adapts to whatever [`TargetSchema`] the destination reports.
pub trait Destination {
    /// Returns the name of the destination.
    fn name() -> &'static str;

    /// Reads the schema of `table`.
    ///
    /// Fails with [`crate::error::ErrorKind::DestinationTableMissing`] when the table has no
    /// columns and with [`crate::error::ErrorKind::MissingPrimaryKey`] when it has no primary
    /// key.
    fn introspect(
        &self,
        table: &TableName,
    ) -> impl Future<Output = EtlResult<TargetSchema>> + Send;

    /// Reads the first value of `column` in the sibling table `table`.
    ///
    /// Returns `None` when the table does not exist or holds no rows.
    fn reference_value(
        &self,
        table: &TableName,
        column: &str,
    ) -> impl Future<Output = EtlResult<Option<String>>> + Send;

    /// Executes `statements` one by one, in order, and returns the number executed.
    ///
    /// The first failing statement aborts the batch with
    /// [`crate::error::ErrorKind::PersistenceFailed`]. Statements executed before it stay
    /// applied.
    fn write_upserts(
        &self,
        statements: Vec<UpsertStatement>,
    ) -> impl Future<Output = EtlResult<u64>> + Send;
}
