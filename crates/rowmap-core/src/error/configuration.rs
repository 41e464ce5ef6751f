use super::Error;

/// Error when record types are wired incorrectly.
///
/// This occurs when:
/// - A record type is used before being registered
/// - Field or relationship metadata is malformed or contradictory
/// - A foreign key cannot be matched to a navigation slot
///
/// These are programming errors and surface at registration time whenever
/// possible.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
