use super::Transaction;
use crate::Result;

use rowmap_core::{
    driver::{Executor, Flavor, Rows},
    schema::SemanticType,
    stmt::Value,
    Error,
};
use rowmap_sql::{Serializer, Statement};

/// The executor of one `Db` together with the serializer for its dialect.
#[derive(Debug)]
pub(crate) struct Conn {
    executor: Box<dyn Executor>,
    serializer: Serializer,

    /// A transaction was dropped without being committed or rolled back.
    pub(super) dangling: bool,
}

impl Conn {
    pub(crate) fn new(executor: Box<dyn Executor>) -> Conn {
        let serializer = Serializer::new(executor.flavor());
        Conn {
            executor,
            serializer,
            dangling: false,
        }
    }

    pub(crate) fn executor_mut(&mut self) -> &mut dyn Executor {
        &mut *self.executor
    }

    pub(crate) fn flavor(&self) -> Flavor {
        self.serializer.flavor()
    }

    fn render(&self, stmt: &Statement) -> (String, Vec<Value>) {
        let mut params = vec![];
        let sql = self.serializer.serialize(stmt, &mut params);
        tracing::debug!(target: "rowmap::sql", sql = %sql, params = params.len(), "exec");
        (sql, params)
    }

    /// Runs a statement and returns the number of affected rows.
    pub(crate) async fn execute(&mut self, stmt: &Statement) -> Result<u64> {
        let (sql, params) = self.render(stmt);
        self.executor.execute(&sql, &params).await
    }

    pub(crate) async fn query(&mut self, stmt: &Statement) -> Result<Rows> {
        let (sql, params) = self.render(stmt);
        self.executor.query(&sql, &params).await
    }

    pub(crate) async fn scalar(&mut self, stmt: &Statement) -> Result<Value> {
        let (sql, params) = self.render(stmt);
        self.executor.execute_scalar(&sql, &params).await
    }

    /// Runs an insert and returns the generated `Id`.
    pub(crate) async fn insert(&mut self, stmt: &Statement) -> Result<i64> {
        let id = if stmt.returns_rows() {
            self.scalar(stmt).await?
        } else {
            self.execute(stmt).await?;
            self.scalar(&Statement::last_insert_id()).await?
        };

        if id.is_null() {
            return Err(rowmap_core::err!("insert did not return a generated `Id`"));
        }

        id.coerce(&SemanticType::BigInt)?.to_i64()
    }

    pub(crate) async fn begin(&mut self) -> Result<Transaction<'_>> {
        if self.dangling {
            self.dangling = false;
            if let Err(err) = self.executor.rollback().await {
                tracing::warn!(error = %err, "rolling back an abandoned transaction failed");
            }
        }

        self.executor
            .begin()
            .await
            .map_err(|err| Error::transaction("begin", err))?;

        Ok(Transaction::new(self))
    }

    pub(super) async fn commit(&mut self) -> Result<()> {
        self.executor
            .commit()
            .await
            .map_err(|err| Error::transaction("commit", err))
    }

    pub(super) async fn rollback(&mut self) -> Result<()> {
        self.executor
            .rollback()
            .await
            .map_err(|err| Error::transaction("rollback", err))
    }

    pub(crate) async fn close(&mut self) -> Result<()> {
        self.executor.close().await
    }
}
