use super::conn::Conn;
use crate::Result;

use std::ops::{Deref, DerefMut};

/// An open `BEGIN … COMMIT` block on a connection.
///
/// Statements run through the transaction with the [`Conn`] methods it
/// dereferences to. A transaction must be finished with [`finish`]; one that
/// is dropped instead is rolled back before the next transaction begins.
///
/// [`finish`]: Transaction::finish
#[derive(Debug)]
pub(crate) struct Transaction<'a> {
    conn: &'a mut Conn,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(super) fn new(conn: &'a mut Conn) -> Transaction<'a> {
        Transaction {
            conn,
            finished: false,
        }
    }

    /// Commits if `result` is `Ok`, rolls back otherwise.
    ///
    /// A failed rollback is logged; the error that caused it is returned.
    pub(crate) async fn finish<T>(mut self, result: Result<T>) -> Result<T> {
        self.finished = true;

        match result {
            Ok(value) => {
                if let Err(err) = self.conn.commit().await {
                    if let Err(rollback) = self.conn.rollback().await {
                        tracing::warn!(error = %rollback, "rollback after failed commit failed");
                    }
                    return Err(err);
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.conn.rollback().await {
                    tracing::warn!(
                        error = %rollback,
                        cause = %err,
                        "rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = Conn;

    fn deref(&self) -> &Conn {
        self.conn
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Conn {
        self.conn
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("transaction dropped without commit or rollback");
            self.conn.dangling = true;
        }
    }
}
