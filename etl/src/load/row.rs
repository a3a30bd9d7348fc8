use std::collections::HashMap;

use chrono::NaiveDate;
use etl_mysql::types::{FALLBACK_KEY_RANGE, TargetSchema};

use crate::mapping::{Attribute, ColumnMapping};
use crate::normalize::title_case;
use crate::types::{Cell, UnifiedCustomer};

/// Values written where the customer record has nothing better.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDefaults {
    /// Text written for unknown string values.
    pub sentinel: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub grade: i64,
    pub salary: f64,
    /// Agent code read from the reference table, if any.
    pub agent_code: Option<String>,
}

impl LoadDefaults {
    pub const DEFAULT_SENTINEL: &'static str = "Unknown";

    /// Date written into required date columns.
    pub fn epoch() -> NaiveDate {
        NaiveDate::default()
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn with_agent_code(mut self, agent_code: Option<String>) -> Self {
        self.agent_code = agent_code;
        self
    }
}

impl Default for LoadDefaults {
    fn default() -> Self {
        Self {
            sentinel: Self::DEFAULT_SENTINEL.to_string(),
            city: "Unknown".to_string(),
            country: "UK".to_string(),
            phone: String::new(),
            grade: 1,
            salary: 0.0,
            agent_code: None,
        }
    }
}

/// Builds the `(column, value)` pairs written for `customer`, in table order.
///
/// The primary key is written unless MySQL assigns it. Numeric keys are clamped into the
/// column range. Required columns left without a value get a type-dependent filler.
pub fn build_row(
    customer: &UnifiedCustomer,
    schema: &TargetSchema,
    mapping: &ColumnMapping,
    defaults: &LoadDefaults,
) -> Vec<(String, Cell)> {
    let mut values: HashMap<&str, Cell> = HashMap::new();

    let key = schema.primary_key();
    if !key.auto_increment {
        let cell = if key.is_numeric() {
            let range = schema.key_range().unwrap_or(FALLBACK_KEY_RANGE);
            Cell::I64(range.clamp(customer.id()))
        } else {
            Cell::String(customer.id().to_string())
        };
        values.insert(key.name.as_str(), cell);
    }

    for (attribute, column) in mapping.iter() {
        if let Some(cell) = attribute_value(attribute, customer, defaults) {
            values.insert(column, cell);
        }
    }

    for column in schema.required_columns() {
        values.entry(column.name.as_str()).or_insert_with(|| {
            if column.is_numeric() {
                Cell::I64(0)
            } else if column.is_date() {
                Cell::Date(LoadDefaults::epoch())
            } else {
                Cell::String(defaults.sentinel.clone())
            }
        });
    }

    schema
        .columns()
        .iter()
        .filter_map(|column| {
            values
                .remove(column.name.as_str())
                .map(|cell| (column.name.clone(), cell))
        })
        .collect()
}

fn attribute_value(
    attribute: Attribute,
    customer: &UnifiedCustomer,
    defaults: &LoadDefaults,
) -> Option<Cell> {
    let text_or_sentinel = |value: Option<&str>| {
        let value = value.map(str::trim).filter(|value| !value.is_empty());
        Cell::String(value.unwrap_or(defaults.sentinel.as_str()).to_string())
    };

    let cell = match attribute {
        Attribute::FirstName => Cell::String(name_or_sentinel(&customer.first, defaults)),
        Attribute::LastName => Cell::String(name_or_sentinel(&customer.last, defaults)),
        Attribute::FullName => {
            let full_name = title_case(&format!("{} {}", customer.first, customer.last));
            if full_name.is_empty() {
                Cell::String(defaults.sentinel.clone())
            } else {
                Cell::String(full_name)
            }
        }
        Attribute::Address => text_or_sentinel(customer.address.as_deref()),
        Attribute::PostalCode => text_or_sentinel(customer.postcode.as_deref()),
        Attribute::City => Cell::String(defaults.city.clone()),
        Attribute::Country => Cell::String(defaults.country.clone()),
        Attribute::Phone => Cell::String(defaults.phone.clone()),
        Attribute::Grade => Cell::I64(defaults.grade),
        Attribute::Salary => Cell::F64(customer.salary.unwrap_or(defaults.salary)),
        Attribute::AgentCode => Cell::String(defaults.agent_code.clone()?),
        Attribute::MaritalStatus => Cell::String(known(customer.marital_status.as_deref())?),
        Attribute::Email => Cell::String(known(customer.email.as_deref())?),
    };

    Some(cell)
}

fn name_or_sentinel(name: &str, defaults: &LoadDefaults) -> String {
    let name = title_case(name);
    if name.is_empty() {
        defaults.sentinel.clone()
    } else {
        name
    }
}

fn known(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
