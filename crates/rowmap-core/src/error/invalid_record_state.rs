use super::Error;

/// Error when an operation is not allowed in the record's lifecycle state,
/// such as saving a record that was deleted.
#[derive(Debug)]
pub(super) struct InvalidRecordState {
    message: Box<str>,
}

impl std::error::Error for InvalidRecordState {}

impl core::fmt::Display for InvalidRecordState {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid record state: {}", self.message)
    }
}

impl Error {
    pub fn invalid_record_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRecordState(InvalidRecordState {
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_record_state(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidRecordState(_)))
    }
}
