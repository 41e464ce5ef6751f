use super::Error;

/// Error when a table or column name does not follow the identifier grammar.
///
/// Identifiers are never interpolated into SQL unless they pass validation,
/// so this error is raised before any statement reaches the executor.
#[derive(Debug)]
pub(super) struct InvalidIdentifier {
    name: Box<str>,
}

impl std::error::Error for InvalidIdentifier {}

impl core::fmt::Display for InvalidIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid identifier: {:?}", self.name)
    }
}

impl Error {
    /// Creates an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidIdentifier(InvalidIdentifier {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid identifier error.
    pub fn is_invalid_identifier(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidIdentifier(_)))
    }
}
