mod value;
pub(crate) use value::Value;

use rowmap_core::{
    async_trait,
    driver::{Executor, Flavor, Rows},
    stmt, Error, Result,
};
use rusqlite::{Connection as RusqliteConnection, ErrorCode};
use std::path::{Path, PathBuf};
use url::Url;

/// Where the database lives.
#[derive(Debug, Clone)]
pub enum Target {
    File(PathBuf),
    InMemory,
}

/// An [`Executor`] backed by a single SQLite connection.
#[derive(Debug)]
pub struct Sqlite {
    target: Target,
    connection: Option<RusqliteConnection>,
}

impl Sqlite {
    /// Create a new SQLite executor from a connection URL such as
    /// `sqlite::memory:` or `sqlite:/var/db/app.db`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "missing database path; url={}",
                url_str
            )))
        } else {
            Ok(Self::open(url.path()))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            target: Target::InMemory,
            connection: None,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
            connection: None,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    fn connection(&mut self) -> Result<&mut RusqliteConnection> {
        self.connection
            .as_mut()
            .ok_or_else(|| rowmap_core::err!("SQLite connection is not open"))
    }
}

/// Maps rusqlite failures, keeping constraint violations distinguishable.
fn map_err(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Error::constraint_violation(message.clone().unwrap_or_else(|| err.to_string()))
        }
        _ => Error::driver_operation_failed(err),
    }
}

fn bind(params: &[stmt::Value]) -> Vec<Value> {
    params.iter().cloned().map(Value::from).collect()
}

#[async_trait]
impl Executor for Sqlite {
    fn flavor(&self) -> Flavor {
        Flavor::Sqlite
    }

    async fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        let connection = match &self.target {
            Target::File(path) => RusqliteConnection::open(path),
            Target::InMemory => RusqliteConnection::open_in_memory(),
        }
        .map_err(Error::driver_operation_failed)?;

        // Foreign keys are off by default in SQLite
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Error::driver_operation_failed)?;

        self.connection = Some(connection);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection
                .close()
                .map_err(|(_, err)| Error::driver_operation_failed(err))?;
        }
        Ok(())
    }

    async fn begin(&mut self) -> Result<()> {
        self.connection()?
            .execute_batch("BEGIN")
            .map_err(Error::driver_operation_failed)
    }

    async fn commit(&mut self) -> Result<()> {
        self.connection()?
            .execute_batch("COMMIT")
            .map_err(map_err)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.connection()?
            .execute_batch("ROLLBACK")
            .map_err(Error::driver_operation_failed)
    }

    async fn execute(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let params = bind(params);
        let mut stmt = self.connection()?.prepare_cached(sql).map_err(map_err)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(map_err)?;

        Ok(count as u64)
    }

    async fn execute_scalar(&mut self, sql: &str, params: &[stmt::Value]) -> Result<stmt::Value> {
        let mut rows = self.query(sql, params).await?;

        let Some(mut row) = rows.next() else {
            return Ok(stmt::Value::Null);
        };

        let first = row.columns()[0].clone();
        row.take(&first)
    }

    async fn query(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Rows> {
        let params = bind(params);
        let mut stmt = self.connection()?.prepare_cached(sql).map_err(map_err)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut ret = Rows::new(columns);

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(map_err)?;

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        let value = row.get_ref(index).map_err(Error::driver_operation_failed)?;
                        items.push(Value::from_sql(value)?.into_inner());
                    }

                    ret.push(items)?;
                }
                Ok(None) => break,
                Err(err) => return Err(map_err(err)),
            }
        }

        Ok(ret)
    }
}
