//! Destination abstractions for consolidated customers.
//!
//! This module provides the [`Destination`] trait, a MySQL implementation and an in-memory
//! implementation that applies the same upsert semantics.

mod base;
pub mod memory;
pub mod mysql;

pub use base::Destination;
