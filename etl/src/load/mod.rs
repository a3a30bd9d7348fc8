//! Schema-adaptive persistence of unified customers.
//!
//! Each customer becomes one upsert whose columns follow the destination table order.

mod loader;
mod row;
mod statement;

pub use loader::{LoadReport, persist};
pub use row::{LoadDefaults, build_row};
pub use statement::UpsertStatement;
