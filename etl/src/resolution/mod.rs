//! Entity resolution of dependent records to customer identities.
//!
//! Customers are indexed first; vehicles, policies and notes are then matched against the
//! index through increasingly coarse tiers.

mod index;
mod resolver;
mod stats;

pub use index::{IdentityIndex, MatchTier};
pub use resolver::{EntityResolver, Resolution};
pub use stats::ResolutionStats;
