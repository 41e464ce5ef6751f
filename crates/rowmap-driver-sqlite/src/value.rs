use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rowmap_core::{
    stmt::{timestamp, Value as CoreValue},
    Error, Result,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a column of a SQLite row into a core value.
    ///
    /// The result reflects the storage class; the engine coerces it to the
    /// field's semantic type.
    pub fn from_sql(value: ValueRef<'_>) -> Result<Self> {
        let core_value = match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => match std::str::from_utf8(value) {
                Ok(value) => CoreValue::String(value.to_string()),
                Err(err) => return Err(Error::driver_operation_failed(err)),
            },
            ValueRef::Blob(_) => return Err(rowmap_core::err!("BLOB columns are not supported")),
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use CoreValue::*;

        match &self.0 {
            Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            F32(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v as f64))),
            F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Decimal(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(timestamp::format(*v)))),
            Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
