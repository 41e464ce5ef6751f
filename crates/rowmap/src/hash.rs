use rowmap_core::{
    schema::ModelSchema,
    stmt::{timestamp, Value, ValueRecord},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

const DELIMITER: &str = "|";
const NULL: &str = "\0";

/// Computes the content hash of a record.
///
/// The digest covers every declared field followed by `CreatedAt` and
/// `UpdatedAt`, rendered canonically and joined by `|`. `Id` is excluded so
/// the hash is known before the row is inserted.
pub fn content_hash(schema: &ModelSchema, record: &ValueRecord) -> String {
    let mut hasher = Sha256::new();

    for (index, field) in schema.content_fields().enumerate() {
        if index > 0 {
            hasher.update(DELIMITER);
        }

        let value = record.get(&field.name).unwrap_or(&Value::Null);
        hasher.update(canonical(value));
    }

    STANDARD.encode(hasher.finalize())
}

fn canonical(value: &Value) -> String {
    match value {
        Value::Null => NULL.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Timestamp(v) => timestamp::format(*v),
    }
}
