mod flavor;
pub use flavor::Flavor;

mod rows;
pub use rows::{Row, Rows};

use crate::{async_trait, stmt::Value, Result};

use std::fmt::Debug;

/// Connection, transaction, and statement execution primitives of one
/// database connection.
///
/// Statements arrive fully rendered for the executor's [`Flavor`], with
/// every value passed separately as a positional parameter.
#[async_trait]
pub trait Executor: Debug + Send + 'static {
    /// The SQL dialect this executor speaks.
    fn flavor(&self) -> Flavor;

    /// Opens the underlying connection. Opening an open executor is a no-op.
    async fn open(&mut self) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    async fn begin(&mut self) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;

    /// Executes a statement and returns the number of affected rows.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Executes a statement and returns the first column of the first row,
    /// or `Null` if there is none.
    async fn execute_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Value>;

    /// Executes a query and returns all of its rows.
    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Rows>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Box<E> {
    fn flavor(&self) -> Flavor {
        (**self).flavor()
    }

    async fn open(&mut self) -> Result<()> {
        (**self).open().await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }

    async fn begin(&mut self) -> Result<()> {
        (**self).begin().await
    }

    async fn commit(&mut self) -> Result<()> {
        (**self).commit().await
    }

    async fn rollback(&mut self) -> Result<()> {
        (**self).rollback().await
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        (**self).execute(sql, params).await
    }

    async fn execute_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Value> {
        (**self).execute_scalar(sql, params).await
    }

    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Rows> {
        (**self).query(sql, params).await
    }
}
