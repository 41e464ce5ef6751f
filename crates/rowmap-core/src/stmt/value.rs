use super::timestamp;
use crate::{schema::SemanticType, Error, Result};

use jiff::Timestamp;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A single column value, either bound as a statement parameter or read back
/// from a row.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 32-bit float
    F32(f32),

    /// 64-bit float
    F64(f64),

    /// Fixed-point decimal
    Decimal(Decimal),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),

    /// An instant in time, stored with microsecond precision
    Timestamp(Timestamp),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::Decimal(_) => "Decimal",
            Value::Null => "Null",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Value::I32(v) => Ok(v.into()),
            Value::I64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    pub fn to_string_value(self) -> Result<String> {
        match self {
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }

    /// Converts a value read from a driver into the representation of the
    /// given semantic type.
    ///
    /// Drivers return whatever their storage class produced (SQLite returns
    /// integers for booleans and text for timestamps, MySQL returns bytes for
    /// decimals). Null passes through unchanged.
    pub fn coerce(self, ty: &SemanticType) -> Result<Value> {
        use SemanticType as T;

        let ret = match (ty, self) {
            (_, Value::Null) => Value::Null,

            (T::Int, Value::I32(v)) => Value::I32(v),
            (T::Int, Value::I64(v)) => match i32::try_from(v) {
                Ok(v) => Value::I32(v),
                Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
            },
            (T::Int, Value::Bool(v)) => Value::I32(v.into()),

            (T::BigInt, Value::I32(v)) => Value::I64(v.into()),
            (T::BigInt, Value::I64(v)) => Value::I64(v),

            (T::Bool, Value::Bool(v)) => Value::Bool(v),
            (T::Bool, Value::I32(v)) => Value::Bool(v != 0),
            (T::Bool, Value::I64(v)) => Value::Bool(v != 0),

            (T::String, Value::String(v)) => Value::String(v),

            (T::Timestamp, Value::Timestamp(v)) => Value::Timestamp(timestamp::truncate(v)?),
            (T::Timestamp, Value::String(v)) => Value::Timestamp(timestamp::parse(&v)?),

            (T::Decimal, Value::Decimal(v)) => Value::Decimal(v),
            (T::Decimal, Value::I32(v)) => Value::Decimal(v.into()),
            (T::Decimal, Value::I64(v)) => Value::Decimal(v.into()),
            (T::Decimal, Value::F64(v)) => match Decimal::try_from(v) {
                Ok(v) => Value::Decimal(v),
                Err(_) => return Err(Error::type_conversion(Value::F64(v), "Decimal")),
            },
            (T::Decimal, Value::String(v)) => match Decimal::from_str(&v) {
                Ok(v) => Value::Decimal(v),
                Err(_) => return Err(Error::type_conversion(Value::String(v), "Decimal")),
            },

            (T::Float, Value::F32(v)) => Value::F32(v),
            (T::Float, Value::F64(v)) => Value::F32(v as f32),
            (T::Float, Value::I32(v)) => Value::F32(v as f32),
            (T::Float, Value::I64(v)) => Value::F32(v as f32),

            (T::Double, Value::F64(v)) => Value::F64(v),
            (T::Double, Value::F32(v)) => Value::F64(v.into()),
            (T::Double, Value::I32(v)) => Value::F64(v.into()),
            (T::Double, Value::I64(v)) => Value::F64(v as f64),

            (ty, value) => return Err(Error::type_conversion(value, ty.to_string())),
        };

        Ok(ret)
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F32(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_owned())
    }
}

impl From<Timestamp> for Value {
    fn from(src: Timestamp) -> Self {
        Self::Timestamp(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
