use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::normalize::IdentityKey;

/// The tier through which a dependent record was matched, from most to least precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// The record named a customer id that is already known.
    DirectId,
    /// Name and postcode matched.
    Exact,
    /// Name matched a customer indexed without a postcode.
    ExactWithoutPostcode,
    /// Name matched while ignoring the postcode.
    Relaxed,
    /// Only the concatenated full name matched.
    FullName,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchTier::DirectId => "direct_id",
            MatchTier::Exact => "exact",
            MatchTier::ExactWithoutPostcode => "exact_without_postcode",
            MatchTier::Relaxed => "relaxed",
            MatchTier::FullName => "full_name",
        };
        f.write_str(name)
    }
}

/// Lookup structures mapping identity keys to customer ids.
///
/// The exact and relaxed indices keep the first id registered for a key. The full-name index
/// keeps every id registered under a name, in registration order.
#[derive(Debug, Default, Clone)]
pub struct IdentityIndex {
    exact: HashMap<IdentityKey, i64>,
    relaxed: HashMap<IdentityKey, i64>,
    full_name: BTreeMap<String, Vec<i64>>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` under every key derived from `key`.
    pub fn register(&mut self, key: &IdentityKey, id: i64) {
        self.exact.entry(key.clone()).or_insert(id);
        self.relaxed.entry(key.relaxed()).or_insert(id);

        let ids = self.full_name.entry(key.full_name()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// Finds the customer for `key`, trying the exact, postcode-less, relaxed and full-name
    /// tiers in that order.
    pub fn lookup(&self, key: &IdentityKey) -> Option<(i64, MatchTier)> {
        if key.has_postcode()
            && let Some(id) = self.exact.get(key)
        {
            return Some((*id, MatchTier::Exact));
        }

        let relaxed = key.relaxed();
        if let Some(id) = self.exact.get(&relaxed) {
            return Some((*id, MatchTier::ExactWithoutPostcode));
        }

        if let Some(id) = self.relaxed.get(&relaxed) {
            return Some((*id, MatchTier::Relaxed));
        }

        self.lookup_full_name(&key.full_name())
            .map(|id| (id, MatchTier::FullName))
    }

    /// Returns the first id registered under a normalized full name.
    pub fn lookup_full_name(&self, full_name: &str) -> Option<i64> {
        self.full_name
            .get(full_name)
            .and_then(|ids| ids.first().copied())
    }

    /// Full names and their ids, ordered by name.
    pub fn full_names(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.full_name
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
