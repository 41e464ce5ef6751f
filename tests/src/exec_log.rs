use rowmap_core::stmt::Value;

use std::sync::{Arc, Mutex};

/// What an executor was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecKind {
    Begin,
    Commit,
    Rollback,
    Execute,
    Scalar,
    Query,
}

#[derive(Debug, Clone)]
pub struct ExecOp {
    pub kind: ExecKind,
    pub sql: String,
    pub params: Vec<Value>,
}

/// A handle on the operations recorded by a
/// [`LoggingExecutor`](crate::LoggingExecutor).
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<ExecOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<ExecOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ExecOp) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(op))
            .count()
    }

    /// SQL text of every statement, in execution order
    pub fn statements(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !op.sql.is_empty())
            .map(|op| op.sql.clone())
            .collect()
    }

    /// Number of statements whose SQL starts with `prefix`
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.count(|op| op.sql.starts_with(prefix))
    }

    pub fn count_kind(&self, kind: ExecKind) -> usize {
        self.count(|op| op.kind == kind)
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&self) -> Option<ExecOp> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }
}
