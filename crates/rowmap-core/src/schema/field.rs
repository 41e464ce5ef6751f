use super::SemanticType;
use crate::stmt::Value;

/// Declarative description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Column name
    pub name: String,

    pub ty: SemanticType,

    pub nullable: bool,

    pub primary_key: bool,

    /// Value is assigned by the database.
    pub auto_increment: bool,

    /// Maximum length of string columns.
    pub max_length: u32,

    /// String columns are stored with a fixed width.
    pub fixed_length: bool,

    /// Total digits of decimal columns.
    pub precision: u32,

    /// Digits after the decimal point.
    pub scale: u32,

    pub unsigned: bool,

    pub unique: bool,

    pub indexed: bool,

    /// Opaque check expression, passed through verbatim.
    pub check: Option<String>,

    /// Allowed values. Produces an implicit `IN (...)` check.
    pub enum_values: Vec<String>,

    pub default: Option<DefaultValue>,

    pub foreign_key: Option<ForeignKey>,
}

/// Value used when a record is inserted without one.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(Value),

    /// The time of insertion.
    CurrentTimestamp,

    /// The time of the latest write.
    CurrentTimestampOnUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Referenced table
    pub table: String,

    /// Referenced column
    pub column: String,

    pub navigation: Navigation,
}

/// How a foreign key maps to the relationship slot that holds the referenced
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Derived from the field name by the registry's naming convention.
    Convention,

    /// Explicitly named slot.
    Named(String),

    /// The foreign key has no navigation slot.
    None,
}

impl FieldDescriptor {
    pub const DEFAULT_MAX_LENGTH: u32 = 255;
    pub const DEFAULT_PRECISION: u32 = 18;
    pub const DEFAULT_SCALE: u32 = 2;

    pub fn new(name: impl Into<String>, ty: SemanticType) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            ty,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            max_length: Self::DEFAULT_MAX_LENGTH,
            fixed_length: false,
            precision: Self::DEFAULT_PRECISION,
            scale: Self::DEFAULT_SCALE,
            unsigned: false,
            unique: false,
            indexed: false,
            check: None,
            enum_values: vec![],
            default: None,
            foreign_key: None,
        }
    }

    /// Brings a value of this column into its canonical form. Decimals are
    /// rounded and padded to the column's scale so `1` and `1.00` store and
    /// hash identically.
    pub fn normalize(&self, value: Value) -> Value {
        match value {
            Value::Decimal(mut decimal) => {
                decimal = decimal.round_dp(self.scale);
                decimal.rescale(self.scale);
                Value::Decimal(decimal)
            }
            value => value,
        }
    }

    /// The value bound for this column on insert when the record has none.
    pub fn insert_default(&self, now: jiff::Timestamp) -> Option<Value> {
        match self.default.as_ref()? {
            DefaultValue::Literal(value) => Some(value.clone()),
            DefaultValue::CurrentTimestamp | DefaultValue::CurrentTimestampOnUpdate => {
                Some(Value::Timestamp(now))
            }
        }
    }
}
