use tracing::info;

use crate::resolution::MatchTier;

/// Counters collected while resolving one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Customers indexed from the customer source.
    pub customers_indexed: u64,
    /// Customers skipped because a name part was missing.
    pub skipped_customers: u64,
    /// Customers whose id was already taken by an earlier customer.
    pub duplicate_customers: u64,
    pub vehicles_attached: u64,
    /// Vehicles that matched no customer and were dropped.
    pub unmatched_vehicles: u64,
    pub policies_attached: u64,
    /// Customers synthesized for policies whose holder matched no customer.
    pub placeholder_customers: u64,
    /// Policies dropped because they could not be parsed.
    pub skipped_policies: u64,
    /// Note attachments; a note matching several customers counts once per customer.
    pub notes_attached: u64,
    /// Notes that mentioned no known customer.
    pub unattached_notes: u64,
    pub direct_id_matches: u64,
    pub exact_matches: u64,
    pub exact_without_postcode_matches: u64,
    pub relaxed_matches: u64,
    pub full_name_matches: u64,
}

impl ResolutionStats {
    pub(crate) fn record_match(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::DirectId => self.direct_id_matches += 1,
            MatchTier::Exact => self.exact_matches += 1,
            MatchTier::ExactWithoutPostcode => self.exact_without_postcode_matches += 1,
            MatchTier::Relaxed => self.relaxed_matches += 1,
            MatchTier::FullName => self.full_name_matches += 1,
        }
    }

    /// Number of matches made through the given tier.
    pub fn matches(&self, tier: MatchTier) -> u64 {
        match tier {
            MatchTier::DirectId => self.direct_id_matches,
            MatchTier::Exact => self.exact_matches,
            MatchTier::ExactWithoutPostcode => self.exact_without_postcode_matches,
            MatchTier::Relaxed => self.relaxed_matches,
            MatchTier::FullName => self.full_name_matches,
        }
    }

    pub fn log(&self) {
        info!(
            customers_indexed = self.customers_indexed,
            skipped_customers = self.skipped_customers,
            duplicate_customers = self.duplicate_customers,
            vehicles_attached = self.vehicles_attached,
            unmatched_vehicles = self.unmatched_vehicles,
            policies_attached = self.policies_attached,
            placeholder_customers = self.placeholder_customers,
            skipped_policies = self.skipped_policies,
            notes_attached = self.notes_attached,
            unattached_notes = self.unattached_notes,
            "resolution completed"
        );
        info!(
            direct_id = self.direct_id_matches,
            exact = self.exact_matches,
            exact_without_postcode = self.exact_without_postcode_matches,
            relaxed = self.relaxed_matches,
            full_name = self.full_name_matches,
            "resolution matches by tier"
        );
    }
}
