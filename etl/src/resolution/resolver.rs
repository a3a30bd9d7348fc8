use std::collections::BTreeSet;

use etl_mysql::types::IntegerRange;
use tracing::{debug, info, warn};

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::normalize::{IdentityKey, identity_key, normalize_name, parse_currency, parse_date};
use crate::resolution::{IdentityIndex, MatchTier, ResolutionStats};
use crate::surrogate::surrogate_id;
use crate::types::{
    AttachedPolicy, AttachedVehicle, CustomerOrigin, NoteLine, RawCustomer, RawPolicy,
    RawVehicle, UnifiedCustomer, UnifiedCustomers,
};

/// Postcode seed used for placeholder customers whose policy carries no postcode.
const PLACEHOLDER_POSTCODE: &str = "unknown";

/// The outcome of resolving one run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub customers: UnifiedCustomers,
    pub stats: ResolutionStats,
}

/// Matches vehicles, policies and notes to customer identities.
///
/// Construction indexes every customer, so dependents can only be resolved against a complete
/// index. Policies whose holder is unknown create placeholder customers; vehicles that match
/// nothing are dropped; notes attach to every customer whose full name they mention.
#[derive(Debug)]
pub struct EntityResolver {
    index: IdentityIndex,
    customers: UnifiedCustomers,
    stats: ResolutionStats,
    key_range: IntegerRange,
}

impl EntityResolver {
    /// Indexes `customers`. Ids of customers without a natural key are drawn from `key_range`.
    pub fn new(customers: Vec<RawCustomer>, key_range: IntegerRange) -> Self {
        let mut resolver = Self {
            index: IdentityIndex::new(),
            customers: UnifiedCustomers::new(),
            stats: ResolutionStats::default(),
            key_range,
        };

        for customer in customers {
            resolver.index_customer(customer);
        }

        info!(
            customers = resolver.customers.len(),
            skipped = resolver.stats.skipped_customers,
            duplicates = resolver.stats.duplicate_customers,
            "customers indexed"
        );

        resolver
    }

    fn index_customer(&mut self, raw: RawCustomer) {
        let first = raw.first.as_deref().unwrap_or_default();
        let last = raw.last.as_deref().unwrap_or_default();
        let key = identity_key(first, last, raw.postcode.as_deref());

        if !key.is_complete() {
            debug!(id = ?raw.id, "skipping customer without a first and last name");
            self.stats.skipped_customers += 1;
            return;
        }

        let id = raw.id.unwrap_or_else(|| {
            surrogate_id(first, last, raw.postcode.as_deref(), self.key_range)
        });

        let mut customer = UnifiedCustomer::new(id, CustomerOrigin::Source, first, last);
        customer.postcode = raw.postcode.map(|postcode| postcode.trim().to_string());
        customer.marital_status = raw.marital_status;
        customer.salary = raw.salary.as_deref().and_then(parse_currency);
        customer.address = raw.address;
        customer.email = raw.email;

        if self.customers.insert_new(customer) {
            self.stats.customers_indexed += 1;
        } else {
            warn!(id, "customer id already taken, keeping the first record");
            self.stats.duplicate_customers += 1;
        }

        self.index.register(&key, id);
    }

    /// Resolves a dependent record, first by direct id and then by name.
    fn lookup(
        &self,
        customer_id: Option<i64>,
        key: Option<&IdentityKey>,
        full_name: Option<&str>,
    ) -> Option<(i64, MatchTier)> {
        if let Some(id) = customer_id
            && self.customers.contains(id)
        {
            return Some((id, MatchTier::DirectId));
        }

        if let Some(key) = key {
            return self.index.lookup(key);
        }

        full_name
            .map(normalize_name)
            .filter(|full_name| !full_name.is_empty())
            .and_then(|full_name| self.index.lookup_full_name(&full_name))
            .map(|id| (id, MatchTier::FullName))
    }

    /// Attaches a vehicle to its owner. Returns the owner id, or `None` if the vehicle was
    /// dropped.
    pub fn resolve_vehicle(&mut self, vehicle: RawVehicle) -> Option<i64> {
        let key = name_key(
            vehicle.first.as_deref(),
            vehicle.last.as_deref(),
            vehicle.postcode.as_deref(),
        );

        let Some((id, tier)) =
            self.lookup(vehicle.customer_id, key.as_ref(), vehicle.full_name.as_deref())
        else {
            debug!(model = ?vehicle.model, "vehicle matched no customer");
            self.stats.unmatched_vehicles += 1;
            return None;
        };

        let Some(customer) = self.customers.get_mut(id) else {
            self.stats.unmatched_vehicles += 1;
            return None;
        };

        customer.vehicles.push(AttachedVehicle {
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
        });
        self.stats.vehicles_attached += 1;
        self.stats.record_match(tier);

        Some(id)
    }

    pub fn resolve_vehicles(&mut self, vehicles: Vec<RawVehicle>) {
        for vehicle in vehicles {
            self.resolve_vehicle(vehicle);
        }
    }

    /// Attaches a policy to its holder, creating a placeholder customer when the holder is
    /// unknown. Returns the holder id.
    ///
    /// Fails with [`ErrorKind::ParseError`] when the dates or a non-blank payment cannot be
    /// parsed, or the holder has no name. Nothing is attached in that case.
    pub fn resolve_policy(&mut self, policy: RawPolicy) -> EtlResult<i64> {
        let start_date = parse_date(policy.start_date.as_deref().unwrap_or_default())?;
        let end_date = parse_date(policy.end_date.as_deref().unwrap_or_default())?;

        let monthly_payment = match policy.monthly_payment.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_currency(raw) {
                Some(amount) => Some(amount),
                None => bail!(
                    ErrorKind::ParseError,
                    "Unrecognized monthly payment",
                    raw
                ),
            },
            _ => None,
        };

        let attached = AttachedPolicy {
            start_date,
            end_date,
            monthly_payment,
            frequency: policy.frequency,
        };

        let first = policy.first.as_deref().unwrap_or_default();
        let last = policy.last.as_deref().unwrap_or_default();
        let key = name_key(
            policy.first.as_deref(),
            policy.last.as_deref(),
            policy.postcode.as_deref(),
        );

        let id = match self.lookup(policy.customer_id, key.as_ref(), None) {
            Some((id, tier)) => {
                self.stats.record_match(tier);
                id
            }
            None => {
                let Some(key) = key else {
                    bail!(
                        ErrorKind::ParseError,
                        "Policy holder has no name",
                        format!("customer id {:?} is unknown", policy.customer_id)
                    );
                };

                self.create_placeholder(&key, first, last, policy.postcode.as_deref())
            }
        };

        let Some(customer) = self.customers.get_mut(id) else {
            bail!(
                ErrorKind::InvalidData,
                "Indexed customer is missing",
                format!("customer id {id}")
            );
        };
        customer.policies.push(attached);
        self.stats.policies_attached += 1;

        Ok(id)
    }

    fn create_placeholder(
        &mut self,
        key: &IdentityKey,
        first: &str,
        last: &str,
        postcode: Option<&str>,
    ) -> i64 {
        let seed = match postcode.map(str::trim) {
            Some(postcode) if !postcode.is_empty() => postcode,
            _ => PLACEHOLDER_POSTCODE,
        };
        let id = surrogate_id(first, last, Some(seed), self.key_range);

        let mut customer = UnifiedCustomer::new(id, CustomerOrigin::Placeholder, first, last);
        customer.postcode = postcode
            .map(str::trim)
            .filter(|postcode| !postcode.is_empty())
            .map(str::to_string);

        if self.customers.insert_new(customer) {
            debug!(id, "created placeholder customer for policy holder");
            self.stats.placeholder_customers += 1;
        } else {
            warn!(id, "placeholder id collides with an existing customer");
        }

        self.index.register(key, id);

        id
    }

    /// Resolves every policy. Policies that cannot be parsed are skipped and counted.
    pub fn resolve_policies(&mut self, policies: Vec<RawPolicy>) {
        for policy in policies {
            if let Err(err) = self.resolve_policy(policy) {
                warn!(error = %err, "skipping policy");
                self.stats.skipped_policies += 1;
            }
        }
    }

    /// Attaches a note to every customer whose full name appears in it as whole words.
    ///
    /// Returns the ids the note was attached to, in ascending order.
    pub fn attach_note(&mut self, note: &NoteLine) -> Vec<i64> {
        let normalized = format!(" {} ", normalize_name(&note.text));

        let ids: BTreeSet<i64> = self
            .index
            .full_names()
            .filter(|(full_name, _)| normalized.contains(&format!(" {full_name} ")))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();

        if ids.is_empty() {
            self.stats.unattached_notes += 1;
            return Vec::new();
        }

        let text = note.text.trim();
        for id in &ids {
            if let Some(customer) = self.customers.get_mut(*id) {
                customer.notes.push(text.to_string());
                self.stats.notes_attached += 1;
            }
        }

        ids.into_iter().collect()
    }

    pub fn attach_notes(&mut self, notes: &[NoteLine]) {
        for note in notes {
            self.attach_note(note);
        }
    }

    pub fn customers(&self) -> &UnifiedCustomers {
        &self.customers
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    /// Logs the counters and returns the resolved customers.
    pub fn finish(self) -> Resolution {
        self.stats.log();

        Resolution {
            customers: self.customers,
            stats: self.stats,
        }
    }
}

/// Builds an identity key when at least one name part is present.
fn name_key(
    first: Option<&str>,
    last: Option<&str>,
    postcode: Option<&str>,
) -> Option<IdentityKey> {
    let key = identity_key(first.unwrap_or_default(), last.unwrap_or_default(), postcode);

    if key.first.is_empty() && key.last.is_empty() {
        return None;
    }

    Some(key)
}
