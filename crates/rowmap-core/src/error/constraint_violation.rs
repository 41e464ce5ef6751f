use super::Error;

/// Error when the backing store rejects a write because of a unique, check,
/// not-null, or foreign-key constraint.
///
/// The message is the one reported by the database, unmodified. Callers can
/// recover from this error, for example by retrying with a different value.
#[derive(Debug)]
pub(super) struct ConstraintViolation {
    message: Box<str>,
}

impl std::error::Error for ConstraintViolation {}

impl core::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "constraint violation: {}", self.message)
    }
}

impl Error {
    /// Creates a constraint violation error carrying the database message.
    pub fn constraint_violation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConstraintViolation(ConstraintViolation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::ConstraintViolation(_)))
    }
}
