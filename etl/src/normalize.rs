//! Text normalization for names, postcodes, currency amounts and dates.
//!
//! Every function here is pure. Only [`parse_date`] can fail; the others map bad input to an
//! empty string or [`None`].

use chrono::NaiveDate;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};

/// Date layouts accepted by [`parse_date`], tried in order. Day-first wins over month-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Normalized identity of a person used to match dependent records to customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub first: String,
    pub last: String,
    /// Uppercased postcode, empty when unknown.
    pub postcode: String,
}

impl IdentityKey {
    /// Returns the same key with the postcode blanked.
    pub fn relaxed(&self) -> IdentityKey {
        IdentityKey {
            first: self.first.clone(),
            last: self.last.clone(),
            postcode: String::new(),
        }
    }

    pub fn has_postcode(&self) -> bool {
        !self.postcode.is_empty()
    }

    /// Returns `true` when both name parts normalized to something.
    pub fn is_complete(&self) -> bool {
        !self.first.is_empty() && !self.last.is_empty()
    }

    /// The coarse `"first last"` key for this identity.
    pub fn full_name(&self) -> String {
        join_full_name(&self.first, &self.last)
    }
}

/// Lowercases `value`, turns every run of punctuation or symbols into a single space and
/// collapses whitespace.
pub fn normalize_name(value: &str) -> String {
    let replaced: String = value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercases and trims a postcode, mapping absent values to an empty string.
pub fn normalize_postcode(postcode: Option<&str>) -> String {
    postcode
        .map(|postcode| postcode.trim().to_uppercase())
        .unwrap_or_default()
}

/// Capitalizes every whitespace-separated token and lowercases the rest of it.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the identity key of a person.
pub fn identity_key(first: &str, last: &str, postcode: Option<&str>) -> IdentityKey {
    IdentityKey {
        first: normalize_name(first),
        last: normalize_name(last),
        postcode: normalize_postcode(postcode),
    }
}

/// Builds the coarse full-name key, `"first last"` after normalization.
pub fn full_name_key(first: &str, last: &str) -> String {
    join_full_name(&normalize_name(first), &normalize_name(last))
}

fn join_full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

/// Parses a currency formatted amount such as `£1,200.50` or `USD 99`.
///
/// Returns [`None`] for blank or unparseable input.
pub fn parse_currency(value: &str) -> Option<f64> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    let negative = compact.starts_with('-') || compact.starts_with('(');
    let digits = compact.trim_matches(|c: char| !c.is_ascii_digit() && c != '.');
    if digits.is_empty() {
        return None;
    }

    let amount: f64 = digits.parse().ok()?;
    if !amount.is_finite() {
        return None;
    }

    Some(if negative { -amount } else { amount })
}

/// Parses a calendar date in one of the supported layouts.
///
/// Fails with [`ErrorKind::ParseError`] when no layout matches.
pub fn parse_date(value: &str) -> EtlResult<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    bail!(
        ErrorKind::ParseError,
        "Date is not in a supported format",
        format!("`{value}` does not match any of {}", DATE_FORMATS.join(", "))
    )
}
