use crate::exec_log::{ExecKind, ExecLog, ExecOp};

use async_trait::async_trait;
use rowmap_core::{
    driver::{Executor, Flavor, Rows},
    stmt::Value,
    Result,
};

use std::sync::{Arc, Mutex};

/// An executor wrapper that records every call before forwarding it.
#[derive(Debug)]
pub struct LoggingExecutor {
    inner: Box<dyn Executor>,

    /// Using Arc<Mutex> so tests can inspect the log while the executor is
    /// owned by a `Db`
    ops: Arc<Mutex<Vec<ExecOp>>>,
}

impl LoggingExecutor {
    pub fn new(inner: Box<dyn Executor>) -> Self {
        Self {
            inner,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops.clone())
    }

    fn record(&self, kind: ExecKind, sql: &str, params: &[Value]) {
        self.ops
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(ExecOp {
                kind,
                sql: sql.to_string(),
                params: params.to_vec(),
            });
    }
}

#[async_trait]
impl Executor for LoggingExecutor {
    fn flavor(&self) -> Flavor {
        self.inner.flavor()
    }

    async fn open(&mut self) -> Result<()> {
        self.inner.open().await
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }

    async fn begin(&mut self) -> Result<()> {
        self.record(ExecKind::Begin, "", &[]);
        self.inner.begin().await
    }

    async fn commit(&mut self) -> Result<()> {
        self.record(ExecKind::Commit, "", &[]);
        self.inner.commit().await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.record(ExecKind::Rollback, "", &[]);
        self.inner.rollback().await
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(ExecKind::Execute, sql, params);
        self.inner.execute(sql, params).await
    }

    async fn execute_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Value> {
        self.record(ExecKind::Scalar, sql, params);
        self.inner.execute_scalar(sql, params).await
    }

    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Rows> {
        self.record(ExecKind::Query, sql, params);
        self.inner.query(sql, params).await
    }
}
