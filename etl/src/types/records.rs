use serde::{Deserialize, Deserializer};

/// A scalar that sources write either as text or as a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Reads an optional scalar as text. Numbers are rendered without a trailing `.0`.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Scalar::Integer(value) => Some(value.to_string()),
        Scalar::Float(value) => Some(value.to_string()),
        Scalar::Text(value) if value.trim().is_empty() => None,
        Scalar::Text(value) => Some(value),
    }))
}

/// Reads an optional integer written as a number or numeric text.
///
/// Blank or non-numeric text yields [`None`] rather than an error.
fn deserialize_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Scalar::Integer(value) => Some(value),
        Scalar::Float(value) if value.fract() == 0.0 && value.is_finite() => Some(value as i64),
        Scalar::Float(_) => None,
        Scalar::Text(value) => value.trim().parse().ok(),
    }))
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_integer(deserializer)?.and_then(|year| i32::try_from(year).ok()))
}

/// A customer as delivered by the customer source.
///
/// Customers are the source of truth for identity. A customer without both a first and a
/// last name cannot be indexed and is skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCustomer {
    /// Natural key, when the source carries one.
    #[serde(
        default,
        alias = "customer_id",
        alias = "customerId",
        alias = "CUST_CODE",
        deserialize_with = "deserialize_integer"
    )]
    pub id: Option<i64>,
    #[serde(default, alias = "first_name", alias = "firstName", alias = "FirstName")]
    pub first: Option<String>,
    #[serde(default, alias = "last_name", alias = "lastName", alias = "LastName")]
    pub last: Option<String>,
    #[serde(default, alias = "maritalStatus", alias = "marital")]
    pub marital_status: Option<String>,
    /// Raw salary text, numeric or currency formatted.
    #[serde(
        default,
        alias = "annual_salary",
        alias = "annualSalary",
        deserialize_with = "deserialize_text"
    )]
    pub salary: Option<String>,
    #[serde(default, alias = "street", alias = "address_line")]
    pub address: Option<String>,
    #[serde(
        default,
        alias = "postal_code",
        alias = "postalCode",
        alias = "zip",
        deserialize_with = "deserialize_text"
    )]
    pub postcode: Option<String>,
    #[serde(default, alias = "email_address", alias = "emailAddress")]
    pub email: Option<String>,
}

/// A vehicle record. Vehicles have no identity of their own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawVehicle {
    #[serde(default, alias = "manufacturer")]
    pub make: Option<String>,
    #[serde(default, alias = "model_name", alias = "vehicle")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(
        default,
        alias = "customerId",
        alias = "owner_id",
        deserialize_with = "deserialize_integer"
    )]
    pub customer_id: Option<i64>,
    #[serde(default, alias = "first_name", alias = "firstName")]
    pub first: Option<String>,
    #[serde(default, alias = "last_name", alias = "lastName")]
    pub last: Option<String>,
    #[serde(default, alias = "fullName", alias = "owner", alias = "name")]
    pub full_name: Option<String>,
    #[serde(
        default,
        alias = "postal_code",
        alias = "postalCode",
        alias = "zip",
        deserialize_with = "deserialize_text"
    )]
    pub postcode: Option<String>,
}

/// A policy record. Policies identify their holder by name and postcode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPolicy {
    #[serde(default, alias = "first_name", alias = "firstName")]
    pub first: Option<String>,
    #[serde(default, alias = "last_name", alias = "lastName")]
    pub last: Option<String>,
    #[serde(
        default,
        alias = "postal_code",
        alias = "postalCode",
        alias = "zip",
        deserialize_with = "deserialize_text"
    )]
    pub postcode: Option<String>,
    #[serde(
        default,
        alias = "customerId",
        alias = "holder_id",
        deserialize_with = "deserialize_integer"
    )]
    pub customer_id: Option<i64>,
    /// Raw start date text.
    #[serde(default, alias = "start", alias = "startDate")]
    pub start_date: Option<String>,
    /// Raw end date text.
    #[serde(default, alias = "end", alias = "endDate")]
    pub end_date: Option<String>,
    /// Raw monthly payment, numeric or currency formatted.
    #[serde(
        default,
        alias = "payment",
        alias = "monthlyPayment",
        alias = "premium",
        deserialize_with = "deserialize_text"
    )]
    pub monthly_payment: Option<String>,
    #[serde(default, alias = "freq", alias = "payment_frequency")]
    pub frequency: Option<String>,
}

/// One line of free-text notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLine {
    pub text: String,
}

impl NoteLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
