use std::fmt;

use crate::schema::SchemaError;
use crate::types::range::{
    FALLBACK_KEY_RANGE, IntegerRange, integer_range, is_date_type, is_numeric_type,
};

/// Quotes a MySQL identifier with backticks, doubling any embedded backtick.
pub fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

/// A fully qualified MySQL table name consisting of a schema (database) and table name.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TableName {
    /// The schema (database) name containing the table.
    pub schema: String,
    /// The name of the table within the schema.
    pub name: String,
}

impl TableName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> TableName {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Returns the table name as a quoted identifier, e.g. `` `carinsur`.`CUSTOMER` ``.
    pub fn as_quoted_identifier(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.name)
        )
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Metadata of a single destination column.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColumnSchema {
    /// The name of the column.
    pub name: String,
    /// The full column type as reported by MySQL, e.g. `int(11) unsigned`.
    pub typ: String,
    /// Whether the column can contain NULL values.
    pub nullable: bool,
    /// Whether the column declares a default value.
    pub has_default: bool,
    /// Whether MySQL assigns values to this column on insert.
    pub auto_increment: bool,
    /// Whether the column is part of the table's primary key.
    pub primary: bool,
    /// One-based position of the column in the table definition.
    pub ordinal_position: u32,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, typ: impl Into<String>, ordinal_position: u32) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            nullable: true,
            has_default: false,
            auto_increment: false,
            primary: false,
            ordinal_position,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn is_numeric(&self) -> bool {
        is_numeric_type(&self.typ)
    }

    pub fn is_date(&self) -> bool {
        is_date_type(&self.typ)
    }

    /// A column is required when it rejects NULL, has no default and is not filled in by MySQL.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default && !self.auto_increment
    }
}

/// The introspected shape of the destination table.
///
/// A schema always has at least one column and a primary key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TargetSchema {
    name: TableName,
    column_schemas: Vec<ColumnSchema>,
    primary_key: usize,
}

impl TargetSchema {
    /// Builds a schema from column metadata, ordering columns by ordinal position.
    ///
    /// When several columns belong to the primary key, the first one in table order is used.
    pub fn try_new(
        name: TableName,
        mut column_schemas: Vec<ColumnSchema>,
    ) -> Result<Self, SchemaError> {
        if column_schemas.is_empty() {
            return Err(SchemaError::TableNotFound(name.to_string()));
        }

        column_schemas.sort_by_key(|column| column.ordinal_position);

        let Some(primary_key) = column_schemas.iter().position(|column| column.primary) else {
            return Err(SchemaError::MissingPrimaryKey(name.to_string()));
        };

        Ok(Self {
            name,
            column_schemas,
            primary_key,
        })
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Columns in table order.
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.column_schemas
    }

    pub fn num_columns(&self) -> usize {
        self.column_schemas.len()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.column_schemas.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> &ColumnSchema {
        &self.column_schemas[self.primary_key]
    }

    /// Columns other than the key that must receive a value on every insert, in table order.
    ///
    /// Further columns of a composite primary key are included.
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.column_schemas
            .iter()
            .enumerate()
            .filter(|(position, column)| *position != self.primary_key && column.is_required())
            .map(|(_, column)| column)
    }

    /// Range of values the primary key accepts, or `None` if the key is not numeric.
    pub fn key_range(&self) -> Option<IntegerRange> {
        let key = self.primary_key();
        if !key.is_numeric() {
            return None;
        }

        let range = integer_range(&key.typ);
        if range == FALLBACK_KEY_RANGE {
            tracing::debug!(
                table = %self.name,
                column = %key.name,
                column_type = %key.typ,
                "primary key type is not a plain integer, using fallback range"
            );
        }

        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_columns() -> Vec<ColumnSchema> {
        vec![
            ColumnSchema::new("CUST_NAME", "varchar(40)", 2).not_null(),
            ColumnSchema::new("CUST_CODE", "int(11)", 1).primary_key(),
            ColumnSchema::new("GRADE", "int(11)", 3).not_null().with_default(),
            ColumnSchema::new("PHONE_NO", "varchar(17)", 4),
        ]
    }

    #[test]
    fn test_columns_are_ordered_by_position() {
        let schema =
            TargetSchema::try_new(TableName::new("carinsur", "CUSTOMER"), customer_columns())
                .unwrap();

        let names: Vec<_> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["CUST_CODE", "CUST_NAME", "GRADE", "PHONE_NO"]);
        assert_eq!(schema.primary_key().name, "CUST_CODE");
        assert!(schema.has_column("GRADE"));
        assert!(!schema.has_column("grade"));
    }

    #[test]
    fn test_required_columns() {
        let schema =
            TargetSchema::try_new(TableName::new("carinsur", "CUSTOMER"), customer_columns())
                .unwrap();

        let required: Vec<_> = schema.required_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(required, ["CUST_NAME"]);
    }

    #[test]
    fn test_trailing_composite_key_columns_are_required() {
        let schema = TargetSchema::try_new(
            TableName::new("carinsur", "customers"),
            vec![
                ColumnSchema::new("region", "varchar(4)", 2)
                    .not_null()
                    .primary_key(),
                ColumnSchema::new("id", "int(11)", 1).not_null().primary_key(),
            ],
        )
        .unwrap();

        let required: Vec<_> = schema.required_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(schema.primary_key().name, "id");
        assert_eq!(required, ["region"]);
    }

    #[test]
    fn test_auto_increment_key_is_not_required() {
        let schema = TargetSchema::try_new(
            TableName::new("carinsur", "customers"),
            vec![ColumnSchema::new("id", "bigint(20) unsigned", 1)
                .primary_key()
                .auto_increment()],
        )
        .unwrap();

        assert_eq!(schema.required_columns().count(), 0);
        assert_eq!(schema.key_range(), Some(IntegerRange::new(0, i64::MAX)));
    }

    #[test]
    fn test_schema_without_primary_key_is_rejected() {
        let err = TargetSchema::try_new(
            TableName::new("carinsur", "CUSTOMER"),
            vec![ColumnSchema::new("CUST_NAME", "varchar(40)", 1)],
        )
        .unwrap_err();

        assert!(matches!(err, SchemaError::MissingPrimaryKey(_)));
    }

    #[test]
    fn test_schema_without_columns_is_rejected() {
        let err =
            TargetSchema::try_new(TableName::new("carinsur", "CUSTOMER"), vec![]).unwrap_err();

        assert!(matches!(err, SchemaError::TableNotFound(_)));
    }

    #[test]
    fn test_text_key_has_no_range() {
        let schema = TargetSchema::try_new(
            TableName::new("carinsur", "CUSTOMER"),
            vec![ColumnSchema::new("CUST_CODE", "varchar(6)", 1).primary_key()],
        )
        .unwrap();

        assert_eq!(schema.key_range(), None);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_identifier("CUST`CODE"), "`CUST``CODE`");
        assert_eq!(
            TableName::new("carinsur", "CUSTOMER").as_quoted_identifier(),
            "`carinsur`.`CUSTOMER`"
        );
    }
}
