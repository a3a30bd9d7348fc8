//! Mapping of customer attributes to destination columns.
//!
//! The destination layout is only known at runtime, so every attribute comes with an ordered
//! list of plausible column names. The first candidate present in the table wins.

use std::collections::BTreeMap;
use std::fmt;

use etl_mysql::types::TargetSchema;
use tracing::debug;

/// A customer attribute that can be written to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    FirstName,
    LastName,
    FullName,
    Address,
    PostalCode,
    City,
    Country,
    Email,
    Phone,
    MaritalStatus,
    Salary,
    Grade,
    AgentCode,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ordered `(attribute, candidate columns)` pairs consumed by [`map_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<(Attribute, Vec<String>)>,
}

impl CandidateList {
    /// Creates an empty list.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends candidates for `attribute`, replacing any earlier entry for it.
    pub fn with<I, S>(mut self, attribute: Attribute, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = candidates.into_iter().map(Into::into).collect();
        self.entries.retain(|(existing, _)| *existing != attribute);
        self.entries.push((attribute, candidates));
        self
    }

    pub fn candidates(&self, attribute: Attribute) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == attribute)
            .map(|(_, candidates)| candidates.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &[String])> {
        self.entries
            .iter()
            .map(|(attribute, candidates)| (*attribute, candidates.as_slice()))
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::empty()
            .with(
                Attribute::FirstName,
                ["FIRST_NAME", "first_name", "FirstName", "FNAME", "fname"],
            )
            .with(
                Attribute::LastName,
                ["LAST_NAME", "last_name", "LastName", "LNAME", "lname"],
            )
            .with(
                Attribute::FullName,
                ["FULL_NAME", "full_name", "NAME", "name", "CUST_NAME"],
            )
            .with(
                Attribute::Address,
                ["ADDRESS", "address", "Address", "ADDR", "addr", "WORKING_AREA"],
            )
            .with(
                Attribute::PostalCode,
                ["POSTCODE", "postcode", "POSTAL_CODE", "postal_code", "ZIP", "zip"],
            )
            .with(Attribute::City, ["CITY", "city", "CUST_CITY"])
            .with(Attribute::Country, ["COUNTRY", "country", "CUST_COUNTRY"])
            .with(Attribute::Email, ["EMAIL", "email"])
            .with(
                Attribute::Phone,
                ["PHONE", "phone", "PHONE_NO", "PHONE_NUMBER"],
            )
            .with(
                Attribute::MaritalStatus,
                ["MARITAL_STATUS", "marital_status", "MaritalStatus"],
            )
            .with(
                Attribute::Salary,
                ["SALARY", "salary", "AnnualSalary", "annual_salary", "OPENING_AMT"],
            )
            .with(Attribute::Grade, ["GRADE", "grade"])
            .with(Attribute::AgentCode, ["AGENT_CODE", "agent_code"])
    }
}

/// The columns chosen for each mappable attribute. Attributes without a column are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<Attribute, String>,
}

impl ColumnMapping {
    pub fn column(&self, attribute: Attribute) -> Option<&str> {
        self.columns.get(&attribute).map(String::as_str)
    }

    pub fn is_mapped(&self, attribute: Attribute) -> bool {
        self.columns.contains_key(&attribute)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.columns
            .iter()
            .map(|(attribute, column)| (*attribute, column.as_str()))
    }
}

/// Picks a destination column for every attribute in `candidates`.
///
/// Column names match exactly. The primary-key column is never mapped, and a column already
/// taken by an earlier attribute is not reused.
pub fn map_columns(schema: &TargetSchema, candidates: &CandidateList) -> ColumnMapping {
    let primary_key = schema.primary_key().name.as_str();
    let mut mapping = ColumnMapping::default();

    for (attribute, names) in candidates.iter() {
        let column = names.iter().find(|name| {
            name.as_str() != primary_key
                && schema.has_column(name)
                && !mapping.columns.values().any(|taken| taken == *name)
        });

        match column {
            Some(column) => {
                debug!(%attribute, column = %column, "mapped attribute");
                mapping.columns.insert(attribute, column.clone());
            }
            None => debug!(%attribute, "attribute has no destination column"),
        }
    }

    mapping
}
