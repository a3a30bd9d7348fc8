//! MySQL utilities shared by the consolidation crates.
//!
//! This crate describes destination tables (column metadata, primary keys, integer ranges) and
//! reads that description from `information_schema`. Test helpers for throwaway databases live
//! behind the `test-utils` feature.

pub mod db;
pub mod schema;
#[cfg(feature = "test-utils")]
pub mod sqlx;
pub mod types;
