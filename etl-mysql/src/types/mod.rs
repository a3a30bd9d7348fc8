//! Table and column metadata types.

mod range;
mod schema;

pub use range::{FALLBACK_KEY_RANGE, IntegerRange, integer_range, is_date_type, is_numeric_type};
pub use schema::{ColumnSchema, TableName, TargetSchema, quote_identifier};
