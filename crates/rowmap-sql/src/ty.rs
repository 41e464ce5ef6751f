use rowmap_core::{
    driver::Flavor,
    schema::{DefaultValue, FieldDescriptor, SemanticType},
    stmt::{timestamp, Value},
    Error, Result,
};

/// Largest DECIMAL precision accepted by MySQL.
const MAX_DECIMAL_PRECISION: u32 = 65;

/// Largest DECIMAL scale accepted by MySQL.
const MAX_DECIMAL_SCALE: u32 = 30;

/// Longest fixed-width CHAR column in MySQL.
const MAX_CHAR_LENGTH: u32 = 255;

/// Renders the column type clause of a field: base type, nullability, then
/// the default value.
///
/// ```text
/// VARCHAR(20) NOT NULL DEFAULT 'active'
/// DECIMAL(10,2) NOT NULL DEFAULT 0.00
/// DATETIME(6) NULL
/// ```
pub fn map_type(field: &FieldDescriptor, flavor: Flavor) -> Result<String> {
    let mut clause = base_type(field, flavor)?;

    clause.push_str(if field.nullable { " NULL" } else { " NOT NULL" });

    if let Some(default) = &field.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(&default_literal(default, flavor));
    }

    Ok(clause)
}

fn base_type(field: &FieldDescriptor, flavor: Flavor) -> Result<String> {
    let unsigned = field.unsigned && flavor.supports_unsigned();

    let ty = match (&field.ty, flavor) {
        (SemanticType::Custom(name), _) => return Err(Error::unsupported_type(name.as_str())),

        (SemanticType::Int, Flavor::Mysql) if unsigned => "INT UNSIGNED".to_string(),
        (SemanticType::Int, Flavor::Mysql) => "INT".to_string(),
        (SemanticType::BigInt, Flavor::Mysql) if unsigned => "BIGINT UNSIGNED".to_string(),
        (SemanticType::BigInt, Flavor::Mysql) => "BIGINT".to_string(),
        (SemanticType::Int | SemanticType::BigInt, Flavor::Sqlite) => "INTEGER".to_string(),

        (SemanticType::String, _) => string_type(field, flavor)?,

        (SemanticType::Bool, _) => "BOOLEAN".to_string(),

        (SemanticType::Timestamp, Flavor::Mysql) => "DATETIME(6)".to_string(),
        (SemanticType::Timestamp, Flavor::Sqlite) => "TEXT".to_string(),

        // NUMERIC affinity on SQLite, so checks and uniqueness compare numbers
        (SemanticType::Decimal, _) => {
            verify_decimal(field)?;
            format!("DECIMAL({},{})", field.precision, field.scale)
        }

        (SemanticType::Float, Flavor::Mysql) => "FLOAT".to_string(),
        (SemanticType::Double, Flavor::Mysql) => "DOUBLE".to_string(),
        (SemanticType::Float | SemanticType::Double, Flavor::Sqlite) => "REAL".to_string(),
    };

    Ok(ty)
}

fn string_type(field: &FieldDescriptor, flavor: Flavor) -> Result<String> {
    let len = field.max_length;

    if len == 0 {
        return Err(Error::unsupported_type_because(
            "string",
            format!("`{}` has a maximum length of zero", field.name),
        ));
    }

    if field.fixed_length {
        if flavor == Flavor::Mysql && len > MAX_CHAR_LENGTH {
            return Err(Error::unsupported_type_because(
                format!("CHAR({len})"),
                format!("exceeds the maximum of {MAX_CHAR_LENGTH}"),
            ));
        }
        return Ok(format!("CHAR({len})"));
    }

    if let Some(max) = flavor.max_varchar_length() {
        if len > max {
            return Err(Error::unsupported_type_because(
                format!("VARCHAR({len})"),
                format!("exceeds the maximum of {max}"),
            ));
        }
    }

    Ok(format!("VARCHAR({len})"))
}

fn verify_decimal(field: &FieldDescriptor) -> Result<()> {
    let (precision, scale) = (field.precision, field.scale);

    if precision == 0 || precision > MAX_DECIMAL_PRECISION {
        return Err(Error::unsupported_type_because(
            format!("DECIMAL({precision},{scale})"),
            format!("precision must be between 1 and {MAX_DECIMAL_PRECISION}"),
        ));
    }

    if scale > precision || scale > MAX_DECIMAL_SCALE {
        return Err(Error::unsupported_type_because(
            format!("DECIMAL({precision},{scale})"),
            format!("scale must not exceed the precision or {MAX_DECIMAL_SCALE}"),
        ));
    }

    Ok(())
}

fn default_literal(default: &DefaultValue, flavor: Flavor) -> String {
    match (default, flavor) {
        (DefaultValue::Literal(value), _) => value_literal(value, flavor),
        (DefaultValue::CurrentTimestamp, Flavor::Mysql) => "CURRENT_TIMESTAMP(6)".to_string(),
        (DefaultValue::CurrentTimestampOnUpdate, Flavor::Mysql) => {
            "CURRENT_TIMESTAMP(6) ON UPDATE CURRENT_TIMESTAMP(6)".to_string()
        }
        // SQLite has no ON UPDATE clause; the engine refreshes the value on
        // every write.
        (_, Flavor::Sqlite) => "CURRENT_TIMESTAMP".to_string(),
    }
}

fn value_literal(value: &Value, flavor: Flavor) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::String(v) => quote_literal(v, flavor),
        Value::Timestamp(v) => quote_literal(&timestamp::format(*v), flavor),
    }
}

/// Renders a string literal. Single quotes are doubled, and MySQL
/// backslashes are escaped.
pub fn quote_literal(value: &str, flavor: Flavor) -> String {
    let mut ret = String::with_capacity(value.len() + 2);
    ret.push('\'');
    for c in value.chars() {
        match c {
            '\'' => ret.push_str("''"),
            '\\' if flavor == Flavor::Mysql => ret.push_str("\\\\"),
            c => ret.push(c),
        }
    }
    ret.push('\'');
    ret
}
