mod builder;
pub use builder::Builder;

mod conn;
pub(crate) use conn::Conn;

mod connect;
pub use connect::connect;

mod transaction;
pub(crate) use transaction::Transaction;

use crate::{
    cache::IdentityCache, hash::content_hash, model::instantiate, registry::Registry, resolve,
    row::read_record, Model, RecordState, Result,
};

use rowmap_core::{
    driver::Executor,
    schema::{DefaultValue, ModelSchema, SemanticType, CREATED_AT, HASH, ID, UPDATED_AT},
    stmt::{timestamp, Value, ValueRecord},
    Error,
};
use rowmap_sql::Statement;

use jiff::Timestamp;
use std::{collections::HashMap, sync::Arc};

/// Maximum number of keys bound in one `IN` list.
const MAX_IN_LIST: usize = 500;

/// A database handle over one executor.
///
/// Handles created from the same builder, or with [`Db::connect_with`],
/// share the registry and the identity cache.
#[derive(Debug)]
pub struct Db {
    conn: Conn,
    registry: Arc<Registry>,
    cache: Arc<IdentityCache>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    async fn open(
        mut executor: Box<dyn Executor>,
        registry: Arc<Registry>,
        cache: Arc<IdentityCache>,
    ) -> Result<Db> {
        executor.open().await?;

        Ok(Db {
            conn: Conn::new(executor),
            registry,
            cache,
        })
    }

    /// Opens another handle sharing this handle's registry and cache.
    pub async fn connect_with(&self, executor: impl Executor) -> Result<Db> {
        Db::open(
            Box::new(executor),
            self.registry.clone(),
            self.cache.clone(),
        )
        .await
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    pub fn executor_mut(&mut self) -> &mut dyn Executor {
        self.conn.executor_mut()
    }

    pub async fn close(&mut self) -> Result<()> {
        self.conn.close().await
    }

    /// Creates the table of `M`, and its indices, if they do not exist.
    pub async fn ensure_schema<M: Model>(&mut self) -> Result<()> {
        let registry = self.registry.clone();
        self.create_table(registry.describe::<M>()?).await
    }

    /// Creates the tables of every registered type, in registration order.
    pub async fn ensure_schema_all(&mut self) -> Result<()> {
        let registry = self.registry.clone();
        for entry in registry.entries() {
            self.create_table(entry.schema()).await?;
        }
        Ok(())
    }

    async fn create_table(&mut self, schema: &ModelSchema) -> Result<()> {
        let flavor = self.conn.flavor();

        // Every identifier is checked before anything is sent
        let mut stmts = vec![Statement::create_table(schema, flavor)?];
        stmts.extend(Statement::create_indices(schema, flavor)?);

        let mut tx = self.conn.begin().await?;
        let result = execute_all(&mut tx, &stmts).await;
        tx.finish(result).await
    }

    /// Inserts a transient record or updates a persisted one, returning its
    /// `Id`.
    ///
    /// On success `record` holds exactly what was stored: defaults, decimal
    /// scale and timestamps are applied, and relation slots are unloaded.
    pub async fn save<M: Model>(&mut self, record: &mut M) -> Result<i64> {
        let registry = self.registry.clone();
        let schema = registry.describe::<M>()?;

        let stored = match record.meta().state() {
            RecordState::Deleted => {
                return Err(Error::invalid_record_state(format!(
                    "cannot save a deleted `{}` record",
                    schema.table
                )))
            }
            RecordState::Transient => self.insert::<M>(schema, record).await?,
            RecordState::Persisted => self.update::<M>(schema, record).await?,
        };

        let id = stored.meta().id().unwrap_or_default();
        self.remember(schema, &stored);
        *record = stored;

        Ok(id)
    }

    async fn insert<M: Model>(&mut self, schema: &ModelSchema, record: &M) -> Result<M> {
        let now = timestamp::now();

        let mut values = normalize(schema, record.values(), now, true)?;
        values.set(CREATED_AT, now);
        values.set(UPDATED_AT, now);
        values.set(HASH, content_hash(schema, &values));

        let stmt = Statement::insert(schema, &values, self.conn.flavor())?;

        let mut tx = self.conn.begin().await?;
        let result = tx.insert(&stmt).await;
        let id = tx.finish(result).await?;

        values.set(ID, id);
        instantiate(values)
    }

    async fn update<M: Model>(&mut self, schema: &ModelSchema, record: &M) -> Result<M> {
        let meta = record.meta();
        let (Some(id), Some(created_at)) = (meta.id(), meta.created_at()) else {
            return Err(Error::invalid_record_state(format!(
                "persisted `{}` record has no `Id`",
                schema.table
            )));
        };

        let now = timestamp::now();

        let mut values = normalize(schema, record.values(), now, false)?;
        values.set(CREATED_AT, created_at);
        values.set(UPDATED_AT, timestamp::next_after(meta.updated_at(), now)?);
        values.set(HASH, content_hash(schema, &values));

        let stmt = Statement::update_by_id(schema, &values, id)?;

        let mut tx = self.conn.begin().await?;
        let result = match tx.execute(&stmt).await {
            Ok(0) => Err(Error::concurrent_modification(&schema.table, id)),
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        };

        if let Err(err) = tx.finish(result).await {
            if err.is_concurrent_modification() {
                self.cache.invalidate(&schema.table, id);
            }
            return Err(err);
        }

        values.set(ID, id);
        instantiate(values)
    }

    /// Deletes a persisted record and evicts it from the cache. The record
    /// is marked deleted and can no longer be saved.
    pub async fn delete<M: Model>(&mut self, record: &mut M) -> Result<()> {
        let registry = self.registry.clone();
        let schema = registry.describe::<M>()?;

        let id = match (record.meta().state(), record.meta().id()) {
            (RecordState::Persisted, Some(id)) => id,
            (RecordState::Deleted, _) => {
                return Err(Error::invalid_record_state(format!(
                    "`{}` record is already deleted",
                    schema.table
                )))
            }
            _ => {
                return Err(Error::invalid_record_state(format!(
                    "cannot delete a `{}` record that was never saved",
                    schema.table
                )))
            }
        };

        let stmt = Statement::delete_by_id(schema, id)?;

        let mut tx = self.conn.begin().await?;
        let result = match tx.execute(&stmt).await {
            Ok(0) => Err(Error::concurrent_modification(&schema.table, id)),
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        };
        let result = tx.finish(result).await;

        match &result {
            Ok(()) => {
                self.cache.invalidate(&schema.table, id);
                record.meta_mut().state = RecordState::Deleted;
            }
            Err(err) if err.is_concurrent_modification() => {
                self.cache.invalidate(&schema.table, id);
            }
            Err(_) => {}
        }

        result
    }

    /// Loads one record.
    ///
    /// A cached copy is returned when its hash still matches the stored
    /// `Hash` column; otherwise the row is read and the cache refreshed.
    /// With `include_related`, every relationship is resolved one level
    /// deep.
    pub async fn find_by_id<M: Model>(&mut self, id: i64, include_related: bool) -> Result<Option<M>> {
        let registry = self.registry.clone();
        let schema = registry.describe::<M>()?;

        let record = match self.cache.get::<M>(&schema.table, id) {
            Some(cached) => {
                let stmt = Statement::select_hash_by_id(schema, id)?;
                let stored = self.conn.scalar(&stmt).await?;

                if stored.as_str().is_some() && stored.as_str() == cached.meta().hash() {
                    tracing::debug!(target: "rowmap::cache", table = %schema.table, id, "hit");
                    Some(cached)
                } else {
                    tracing::debug!(target: "rowmap::cache", table = %schema.table, id, "stale");
                    self.load_by_id::<M>(schema, id).await?
                }
            }
            None => {
                tracing::debug!(target: "rowmap::cache", table = %schema.table, id, "miss");
                self.load_by_id::<M>(schema, id).await?
            }
        };

        let Some(mut record) = record else {
            return Ok(None);
        };

        if include_related {
            resolve::resolve(&mut self.conn, &registry, &mut record).await?;
        }

        Ok(Some(record))
    }

    /// Loads every record of `M`, ordered by `Id`.
    ///
    /// Only rows whose cached copy is missing or stale are read in full,
    /// with one `IN` query for all of them.
    pub async fn find_all<M: Model>(&mut self, include_related: bool) -> Result<Vec<M>> {
        let registry = self.registry.clone();
        let schema = registry.describe::<M>()?;

        let rows = self.conn.query(&Statement::select_hashes(schema)?).await?;

        let mut slots = Vec::with_capacity(rows.len());
        let mut stale = vec![];

        for mut row in rows {
            let id = row.take(ID)?.coerce(&SemanticType::BigInt)?.to_i64()?;
            let hash = row.take(HASH)?;

            let cached = self.cache.get::<M>(&schema.table, id).filter(|cached| {
                hash.as_str()
                    .is_some_and(|hash| cached.meta().hash() == Some(hash))
            });

            if cached.is_none() {
                stale.push(id);
            }
            slots.push((id, cached));
        }

        tracing::debug!(
            target: "rowmap::cache",
            table = %schema.table,
            rows = slots.len(),
            stale = stale.len(),
            "find_all"
        );

        let mut loaded = HashMap::with_capacity(stale.len());

        for chunk in stale.chunks(MAX_IN_LIST) {
            let rows = self
                .conn
                .query(&Statement::select_by_ids(schema, chunk)?)
                .await?;

            for mut row in rows {
                let record: M = instantiate(read_record(schema, &mut row, None)?)?;
                self.remember(schema, &record);

                if let Some(id) = record.meta().id() {
                    loaded.insert(id, record);
                }
            }
        }

        // Rows deleted between the two queries are skipped
        let mut records: Vec<M> = slots
            .into_iter()
            .filter_map(|(id, cached)| cached.or_else(|| loaded.remove(&id)))
            .collect();

        if include_related {
            for record in &mut records {
                resolve::resolve(&mut self.conn, &registry, record).await?;
            }
        }

        Ok(records)
    }

    async fn load_by_id<M: Model>(&mut self, schema: &ModelSchema, id: i64) -> Result<Option<M>> {
        let mut rows = self.conn.query(&Statement::select_by_id(schema, id)?).await?;

        let Some(mut row) = rows.next() else {
            self.cache.invalidate(&schema.table, id);
            return Ok(None);
        };

        let record: M = instantiate(read_record(schema, &mut row, None)?)?;
        self.remember(schema, &record);
        Ok(Some(record))
    }

    /// Writes a record through to the cache. Records without a stored hash
    /// are never cached.
    fn remember<M: Model>(&self, schema: &ModelSchema, record: &M) {
        let meta = record.meta();
        match (meta.id(), meta.hash()) {
            (Some(id), Some(hash)) => self.cache.put(&schema.table, id, hash, record.clone()),
            (Some(id), None) => {
                self.cache.invalidate(&schema.table, id);
            }
            _ => {}
        }
    }
}

async fn execute_all(conn: &mut Conn, stmts: &[Statement]) -> Result<()> {
    for stmt in stmts {
        conn.execute(stmt).await?;
    }
    Ok(())
}

/// Converts the declared field values of a record into what is written:
/// values are converted to their field's type, defaults are applied, and
/// decimals are rounded to their scale.
fn normalize(
    schema: &ModelSchema,
    mut values: ValueRecord,
    now: Timestamp,
    insert: bool,
) -> Result<ValueRecord> {
    let mut ret = ValueRecord::new();

    for field in schema.declared_fields() {
        let value = if values.contains(&field.name) {
            values.take_value(&field.name)?
        } else {
            Value::Null
        };

        let mut value = value
            .coerce(&field.ty)
            .map_err(|err| err.context(format!("field `{}.{}`", schema.table, field.name)))?;

        match &field.default {
            Some(DefaultValue::CurrentTimestampOnUpdate) => value = Value::Timestamp(now),
            Some(_) if insert && value.is_null() => {
                value = field.insert_default(now).unwrap_or_default();
            }
            _ => {}
        }

        ret.set(field.name.clone(), field.normalize(value));
    }

    if let Some((name, _)) = values.iter().next() {
        return Err(Error::configuration(format!(
            "`{}` has no field `{name}`",
            schema.table
        )));
    }

    Ok(ret)
}
