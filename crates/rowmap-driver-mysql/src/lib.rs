#![allow(clippy::needless_range_loop)]

mod value;
pub(crate) use value::Value;

use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Opts, OptsBuilder,
};
use rowmap_core::{
    async_trait,
    driver::{Executor, Flavor, Rows},
    stmt, Error, Result,
};
use url::Url;

/// Server error codes reported when a statement violates a constraint.
const CONSTRAINT_ERROR_CODES: &[u16] = &[
    1048, // column cannot be null
    1062, // duplicate entry
    1364, // field has no default value
    1451, // row is referenced by a foreign key
    1452, // foreign key target missing
    3819, // check constraint violated
];

/// An [`Executor`] backed by a single MySQL connection.
#[derive(Debug)]
pub struct MySQL {
    opts: Opts,
    conn: Option<Conn>,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "mysql" {
            return Err(Error::invalid_connection_url(format!(
                "connection url does not have a `mysql` scheme; url={}",
                url
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_connection_url(format!(
                "missing host in connection URL; url={}",
                url
            )));
        }

        if url.path().is_empty() || url.path() == "/" {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={}",
                url
            )));
        }

        let opts = Opts::from_url(url.as_ref()).map_err(Error::driver_operation_failed)?;
        let opts = OptsBuilder::from_opts(opts).client_found_rows(true);

        Ok(Self {
            opts: opts.into(),
            conn: None,
        })
    }

    fn conn(&mut self) -> Result<&mut Conn> {
        self.conn
            .as_mut()
            .ok_or_else(|| rowmap_core::err!("MySQL connection is not open"))
    }
}

impl From<Conn> for MySQL {
    fn from(conn: Conn) -> Self {
        Self {
            opts: conn.opts().clone(),
            conn: Some(conn),
        }
    }
}

fn map_err(err: mysql_async::Error) -> Error {
    match &err {
        mysql_async::Error::Server(server) if CONSTRAINT_ERROR_CODES.contains(&server.code) => {
            Error::constraint_violation(server.message.clone())
        }
        _ => Error::driver_operation_failed(err),
    }
}

fn bind(params: &[stmt::Value]) -> mysql_async::Params {
    if params.is_empty() {
        return mysql_async::Params::Empty;
    }

    mysql_async::Params::Positional(
        params
            .iter()
            .cloned()
            .map(|param| Value::from(param).to_value())
            .collect(),
    )
}

#[async_trait]
impl Executor for MySQL {
    fn flavor(&self) -> Flavor {
        Flavor::Mysql
    }

    async fn open(&mut self) -> Result<()> {
        if self.conn.is_none() {
            let conn = Conn::new(self.opts.clone())
                .await
                .map_err(Error::driver_operation_failed)?;
            self.conn = Some(conn);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect()
                .await
                .map_err(Error::driver_operation_failed)?;
        }
        Ok(())
    }

    async fn begin(&mut self) -> Result<()> {
        self.conn()?
            .query_drop("START TRANSACTION")
            .await
            .map_err(Error::driver_operation_failed)
    }

    async fn commit(&mut self) -> Result<()> {
        self.conn()?.query_drop("COMMIT").await.map_err(map_err)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.conn()?
            .query_drop("ROLLBACK")
            .await
            .map_err(Error::driver_operation_failed)
    }

    async fn execute(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let conn = self.conn()?;
        conn.exec_drop(sql, bind(params)).await.map_err(map_err)?;
        Ok(conn.affected_rows())
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
        let conn = self.conn()?;
        let statement = conn.prep(sql).await.map_err(map_err)?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|column| column.name_str().into_owned())
            .collect();

        let rows: Vec<mysql_async::Row> = conn
            .exec(&statement, bind(params))
            .await
            .map_err(map_err)?;

        let mut ret = Rows::new(columns);

        for mut row in rows {
            let mut items = Vec::with_capacity(row.len());
            for index in 0..row.len() {
                let value: Option<mysql_async::Value> = row.take(index);
                let value = value.unwrap_or(mysql_async::Value::NULL);
                items.push(Value::from_sql(value)?.into_inner());
            }
            ret.push(items)?;
        }

        Ok(ret)
    }
}
