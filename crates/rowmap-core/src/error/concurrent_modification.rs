use super::Error;

/// Error when a write by primary key affected no rows.
///
/// The targeted row was removed since the record was loaded.
#[derive(Debug)]
pub(super) struct ConcurrentModification {
    table: Box<str>,
    id: i64,
}

impl std::error::Error for ConcurrentModification {}

impl core::fmt::Display for ConcurrentModification {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "concurrent modification: no row in `{}` with Id = {}",
            self.table, self.id
        )
    }
}

impl Error {
    /// Creates a concurrent modification error for the given row.
    pub fn concurrent_modification(table: impl Into<String>, id: i64) -> Error {
        Error::from(super::ErrorKind::ConcurrentModification(
            ConcurrentModification {
                table: table.into().into(),
                id,
            },
        ))
    }

    /// Returns `true` if this error is a concurrent modification error.
    pub fn is_concurrent_modification(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::ConcurrentModification(_)))
    }
}
