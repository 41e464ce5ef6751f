use super::Error;

/// A connection URL that no enabled driver accepts.
#[derive(Debug)]
pub(super) struct InvalidConnectionUrl {
    pub(super) message: Box<str>,
}

impl Error {
    pub fn invalid_connection_url(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConnectionUrl(InvalidConnectionUrl {
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_connection_url(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidConnectionUrl(_)))
    }
}

impl core::fmt::Display for InvalidConnectionUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid connection URL: {}", self.message)
    }
}
