//! Fixtures shared by unit and integration tests.
//!
//! - [`schema`] builds destination table layouts and memory destinations holding them.
//! - [`records`] builds raw source records.

pub mod records;
pub mod schema;
