use crate::types::{RawCustomer, RawPolicy, RawVehicle};

pub fn customer(id: Option<i64>, first: &str, last: &str, postcode: Option<&str>) -> RawCustomer {
    RawCustomer {
        id,
        first: Some(first.to_string()),
        last: Some(last.to_string()),
        postcode: postcode.map(str::to_string),
        ..RawCustomer::default()
    }
}

pub fn vehicle(
    first: &str,
    last: &str,
    postcode: Option<&str>,
    model: &str,
    year: i32,
) -> RawVehicle {
    RawVehicle {
        first: Some(first.to_string()),
        last: Some(last.to_string()),
        postcode: postcode.map(str::to_string),
        model: Some(model.to_string()),
        year: Some(year),
        ..RawVehicle::default()
    }
}

/// A policy running through 2024, paid monthly.
pub fn policy(first: &str, last: &str, postcode: Option<&str>, payment: &str) -> RawPolicy {
    RawPolicy {
        first: Some(first.to_string()),
        last: Some(last.to_string()),
        postcode: postcode.map(str::to_string),
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-12-31".to_string()),
        monthly_payment: Some(payment.to_string()),
        frequency: Some("Monthly".to_string()),
        ..RawPolicy::default()
    }
}
