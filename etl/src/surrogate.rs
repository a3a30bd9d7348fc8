//! Deterministic surrogate identifiers.
//!
//! Identities without a natural numeric key are hashed into the destination key range. The
//! mapping is stable across runs and machines. Distinct identities can collide: for `n`
//! identities spread over a range of size `N` the chance of at least one collision is about
//! `n² / 2N`. Colliding identities share one destination row.

use etl_mysql::types::IntegerRange;
use sha2::{Digest, Sha256};

use crate::normalize::{normalize_name, normalize_postcode};

/// Postcode placeholder used in the hashed identity when no postcode is known.
const UNKNOWN_POSTCODE: &str = "UNKNOWN";

/// Width of the range used when the key range is empty or below one.
const DEGENERATE_RANGE_WIDTH: i64 = 1000;

/// Returns the surrogate id of the identity `(first, last, postcode)` within `range`.
///
/// The result always lies in `[max(1, range.min), range.max]`, or in
/// `[max(1, range.min), max(1, range.min) + 1000]` when that interval is empty.
pub fn surrogate_id(first: &str, last: &str, postcode: Option<&str>, range: IntegerRange) -> i64 {
    let postcode = match normalize_postcode(postcode) {
        postcode if postcode.is_empty() => UNKNOWN_POSTCODE.to_string(),
        postcode => postcode,
    };
    let identity = format!(
        "{}|{}|{}",
        normalize_name(first),
        normalize_name(last),
        postcode
    );

    let digest = Sha256::digest(identity.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let hash = u64::from_be_bytes(prefix);

    let lo = range.min().max(1);
    let hi = if range.max() < lo {
        lo.saturating_add(DEGENERATE_RANGE_WIDTH)
    } else {
        range.max()
    };

    // The width is at most 2^63, so the offset always fits back into the range.
    let width = (hi as i128 - lo as i128 + 1) as u128;
    let offset = (hash as u128 % width) as i64;

    lo + offset
}
