//! Record types flowing through a consolidation run.
//!
//! Raw records come straight from the sources, unified customers are the output of entity
//! resolution and cells are the typed values written to the destination.

mod cell;
mod records;
mod unified;

pub use cell::Cell;
pub use records::{NoteLine, RawCustomer, RawPolicy, RawVehicle};
pub use unified::{
    AttachedPolicy, AttachedVehicle, CustomerOrigin, UnifiedCustomer, UnifiedCustomers,
};
