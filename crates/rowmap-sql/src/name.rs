use rowmap_core::{Error, Result};

use std::fmt;

/// A table, column, or alias name that passed identifier validation.
///
/// Names are the only way identifiers reach the serializer, so a string that
/// does not follow the grammar can never become part of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Longest identifier accepted by every supported dialect.
    pub const MAX_LEN: usize = 64;

    pub fn new(name: &str) -> Result<Name> {
        if is_valid_identifier(name) {
            Ok(Name(name.to_string()))
        } else {
            Err(Error::invalid_identifier(name))
        }
    }

    /// Builds a name from already validated parts, such as a generated alias.
    pub(crate) fn generated(name: String) -> Name {
        debug_assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'));
        Name(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier grammar: ASCII letters, digits, and underscores; not empty; not
/// purely numeric; at most [`Name::MAX_LEN`] characters.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= Name::MAX_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.chars().all(|c| c.is_ascii_digit())
}
