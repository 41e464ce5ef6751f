use std::fmt;

/// The semantic type of a field, independent of any SQL dialect.
///
/// Nullability is carried separately on the field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// 32-bit signed integer
    Int,

    /// 64-bit signed integer
    BigInt,

    String,

    Bool,

    /// Instant in time, stored with microsecond precision
    Timestamp,

    /// Fixed-point decimal
    Decimal,

    /// 32-bit float
    Float,

    /// 64-bit float
    Double,

    /// An application type with no column mapping. Rejected when the table
    /// definition is generated.
    Custom(String),
}

impl SemanticType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SemanticType::Int
                | SemanticType::BigInt
                | SemanticType::Decimal
                | SemanticType::Float
                | SemanticType::Double
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Int => "int",
            SemanticType::BigInt => "bigint",
            SemanticType::String => "string",
            SemanticType::Bool => "bool",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Decimal => "decimal",
            SemanticType::Float => "float",
            SemanticType::Double => "double",
            SemanticType::Custom(name) => name,
        };
        f.write_str(name)
    }
}
