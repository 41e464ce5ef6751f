use mysql_async::prelude::ToValue;
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
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a MySQL protocol value into a core value. Text results arrive
    /// as bytes and are coerced to the semantic type by the engine.
    pub fn from_sql(value: mysql_async::Value) -> Result<Self> {
        use mysql_async::Value as MyValue;

        let core_value = match value {
            MyValue::NULL => CoreValue::Null,
            MyValue::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(value) => CoreValue::String(value),
                Err(err) => return Err(Error::driver_operation_failed(err)),
            },
            MyValue::Int(value) => CoreValue::I64(value),
            MyValue::UInt(value) => match i64::try_from(value) {
                Ok(value) => CoreValue::I64(value),
                Err(err) => return Err(Error::driver_operation_failed(err)),
            },
            MyValue::Float(value) => CoreValue::F32(value),
            MyValue::Double(value) => CoreValue::F64(value),
            MyValue::Date(year, month, day, hour, minute, second, micros) => {
                let dt = jiff::civil::DateTime::new(
                    year as i16,
                    month as i8,
                    day as i8,
                    hour as i8,
                    minute as i8,
                    second as i8,
                    micros as i32 * 1_000,
                )?;
                CoreValue::Timestamp(timestamp::from_civil(dt)?)
            }
            MyValue::Time(..) => return Err(rowmap_core::err!("TIME columns are not supported")),
        };

        Ok(Value(core_value))
    }
}

impl ToValue for Value {
    fn to_value(&self) -> mysql_async::Value {
        match &self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I32(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F32(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::Decimal(value) => value.to_string().to_value(),
            CoreValue::Null => mysql_async::Value::NULL,
            CoreValue::String(value) => value.to_value(),
            CoreValue::Timestamp(value) => {
                let dt = timestamp::to_civil(*value);
                mysql_async::Value::Date(
                    dt.year() as u16,
                    dt.month() as u8,
                    dt.day() as u8,
                    dt.hour() as u8,
                    dt.minute() as u8,
                    dt.second() as u8,
                    (dt.subsec_nanosecond() / 1_000) as u32,
                )
            }
        }
    }
}
