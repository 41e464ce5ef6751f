use super::Error;

/// Error when beginning, committing, or rolling back a transaction fails.
#[derive(Debug)]
pub(super) struct TransactionError {
    action: &'static str,
    source: Error,
}

impl std::error::Error for TransactionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl core::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "transaction {} failed: {}", self.action, self.source)
    }
}

impl Error {
    /// Wraps an executor failure raised while running `action` (begin, commit, rollback).
    pub fn transaction(action: &'static str, source: Error) -> Error {
        Error::from(super::ErrorKind::Transaction(TransactionError {
            action,
            source,
        }))
    }

    /// Returns `true` if this error is a transaction error.
    pub fn is_transaction(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Transaction(_)))
    }
}
