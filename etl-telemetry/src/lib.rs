//! Logging setup shared by the consolidator binary and tests.

pub mod tracing;
