use super::Value;
use crate::{Error, Result};

use jiff::Timestamp;
use rust_decimal::Decimal;

/// A Rust type that can be stored in a single column.
pub trait Primitive: Sized {
    fn load(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Primitive for $ty {
                fn load(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        value => Err(Error::type_conversion(value, stringify!($ty))),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => String,
    Timestamp => Timestamp,
}

impl<T: Primitive> Primitive for Option<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}
