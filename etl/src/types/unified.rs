use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::NaiveDate;

/// How a unified customer came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerOrigin {
    /// Built from a record of the customer source.
    Source,
    /// Synthesized for a policy whose holder matched no customer.
    Placeholder,
}

/// A vehicle attached to a unified customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedVehicle {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

/// A policy attached to a unified customer, with parsed dates and payment.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedPolicy {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_payment: Option<f64>,
    pub frequency: Option<String>,
}

/// One resolved customer identity and everything attached to it.
///
/// The id is fixed at construction. Attributes are kept as delivered by the source;
/// formatting for the destination happens at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedCustomer {
    id: i64,
    pub origin: CustomerOrigin,
    pub first: String,
    pub last: String,
    pub postcode: Option<String>,
    pub marital_status: Option<String>,
    pub salary: Option<f64>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub vehicles: Vec<AttachedVehicle>,
    pub policies: Vec<AttachedPolicy>,
    pub notes: Vec<String>,
}

impl UnifiedCustomer {
    pub fn new(id: i64, origin: CustomerOrigin, first: &str, last: &str) -> Self {
        Self {
            id,
            origin,
            first: first.trim().to_string(),
            last: last.trim().to_string(),
            postcode: None,
            marital_status: None,
            salary: None,
            address: None,
            email: None,
            vehicles: Vec::new(),
            policies: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_placeholder(&self) -> bool {
        self.origin == CustomerOrigin::Placeholder
    }
}

/// The set of unified customers of one run, keyed by id and iterated in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedCustomers {
    customers: BTreeMap<i64, UnifiedCustomer>,
}

impl UnifiedCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.customers.contains_key(&id)
    }

    pub fn get(&self, id: i64) -> Option<&UnifiedCustomer> {
        self.customers.get(&id)
    }

    pub fn iter(&self) -> btree_map::Values<'_, i64, UnifiedCustomer> {
        self.customers.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.customers.keys().copied()
    }

    /// Inserts `customer` unless its id is taken. Returns `false` if the id was already present.
    pub(crate) fn insert_new(&mut self, customer: UnifiedCustomer) -> bool {
        match self.customers.entry(customer.id) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(customer);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut UnifiedCustomer> {
        self.customers.get_mut(&id)
    }
}

impl<'a> IntoIterator for &'a UnifiedCustomers {
    type Item = &'a UnifiedCustomer;
    type IntoIter = btree_map::Values<'a, i64, UnifiedCustomer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
