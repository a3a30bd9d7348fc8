use std::fmt;

/// Type-name tokens that mark a column as numeric.
const NUMERIC_TYPE_TOKENS: &[&str] = &["int", "decimal", "float", "double", "numeric", "real"];

/// Range assumed for numeric key columns whose exact integer type is not recognized.
pub const FALLBACK_KEY_RANGE: IntegerRange = IntegerRange::new(1, 2_147_483_647);

/// An inclusive range of integer values a column can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerRange {
    min: i64,
    max: i64,
}

impl IntegerRange {
    /// Creates a new range. `min` must not exceed `max`.
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Forces `value` into the range.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

impl fmt::Display for IntegerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Returns the storable range for a MySQL column type such as `int(11)` or
/// `bigint(20) unsigned`.
///
/// The upper bound of `bigint unsigned` is capped at [`i64::MAX`]. Unrecognized types yield
/// [`FALLBACK_KEY_RANGE`].
pub fn integer_range(column_type: &str) -> IntegerRange {
    let lowered = column_type.trim().to_ascii_lowercase();
    let unsigned = lowered.contains("unsigned");
    let base: String = lowered
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    match (base.as_str(), unsigned) {
        ("tinyint", false) => IntegerRange::new(-128, 127),
        ("tinyint", true) => IntegerRange::new(0, 255),
        ("smallint", false) => IntegerRange::new(-32_768, 32_767),
        ("smallint", true) => IntegerRange::new(0, 65_535),
        ("mediumint", false) => IntegerRange::new(-8_388_608, 8_388_607),
        ("mediumint", true) => IntegerRange::new(0, 16_777_215),
        ("int" | "integer", false) => IntegerRange::new(-2_147_483_648, 2_147_483_647),
        ("int" | "integer", true) => IntegerRange::new(0, 4_294_967_295),
        ("bigint", false) => IntegerRange::new(i64::MIN, i64::MAX),
        ("bigint", true) => IntegerRange::new(0, i64::MAX),
        _ => FALLBACK_KEY_RANGE,
    }
}

/// Returns `true` if the column type holds numbers.
pub fn is_numeric_type(column_type: &str) -> bool {
    let lowered = column_type.to_ascii_lowercase();
    NUMERIC_TYPE_TOKENS
        .iter()
        .any(|token| lowered.contains(token))
}

/// Returns `true` if the column type holds dates (`date`, `datetime`, ...).
pub fn is_date_type(column_type: &str) -> bool {
    column_type.to_ascii_lowercase().contains("date")
}
