//! Customer record consolidation.
//!
//! Raw customer, vehicle, policy and note records are resolved into one unified record per
//! customer identity and upserted into a destination table whose layout is discovered at
//! runtime.

pub mod destination;
pub mod error;
pub mod load;
mod macros;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod resolution;
pub mod sources;
pub mod surrogate;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
