/// SQL dialects the statement serializer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Mysql,
    Sqlite,
}

impl Flavor {
    /// Longest VARCHAR the dialect accepts, if limited.
    pub fn max_varchar_length(self) -> Option<u32> {
        match self {
            // 65,535 byte row limit with 4-byte utf8mb4 characters
            Flavor::Mysql => Some(16_383),
            Flavor::Sqlite => None,
        }
    }

    /// True if INSERT can return the generated key directly.
    pub fn supports_returning(self) -> bool {
        matches!(self, Flavor::Sqlite)
    }

    /// Index definitions are part of CREATE TABLE rather than separate
    /// statements.
    pub fn inline_indices(self) -> bool {
        matches!(self, Flavor::Mysql)
    }

    /// Unsigned numeric types exist in the dialect.
    pub fn supports_unsigned(self) -> bool {
        matches!(self, Flavor::Mysql)
    }
}
