use crate::{stmt::Value, Error, Result};

use std::{collections::VecDeque, sync::Arc};

/// The fully materialized result of a query.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    columns: Arc<[String]>,
    rows: VecDeque<Vec<Value>>,
}

/// One result row. Columns are accessed by name.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Option<Value>>,
}

impl Rows {
    pub fn new(columns: Vec<String>) -> Rows {
        Rows {
            columns: columns.into(),
            rows: VecDeque::new(),
        }
    }

    /// Appends a row. Its width must match the column list.
    pub fn push(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::configuration(format!(
                "row has {} values but the result has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push_back(values);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn next_row(&mut self) -> Option<Row> {
        let values = self.rows.pop_front()?;
        Some(Row {
            columns: self.columns.clone(),
            values: values.into_iter().map(Some).collect(),
        })
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }
}

impl Row {
    fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| Error::configuration(format!("result has no column `{name}`")))
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self.index_of(name)?;
        self.values[index]
            .as_ref()
            .ok_or_else(|| Error::configuration(format!("column `{name}` was already taken")))
    }

    pub fn is_null(&self, name: &str) -> Result<bool> {
        self.get(name).map(Value::is_null)
    }

    /// Moves the value out of the row.
    pub fn take(&mut self, name: &str) -> Result<Value> {
        let index = self.index_of(name)?;
        self.values[index]
            .take()
            .ok_or_else(|| Error::configuration(format!("column `{name}` was already taken")))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
