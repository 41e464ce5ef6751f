use crate::{relation::Relation, Result};

use rowmap_core::{
    schema::{ModelBuilder, CREATED_AT, HASH, ID, UPDATED_AT},
    stmt::ValueRecord,
};

use jiff::Timestamp;

/// A record type mapped onto one table.
///
/// Implementations describe their columns once, in [`describe`], and convert
/// between themselves and a [`ValueRecord`] of their declared fields. The
/// engine-managed columns (`Id`, `CreatedAt`, `UpdatedAt`, `Hash`) live in
/// the embedded [`RecordMeta`] and are never part of `values` or `load`.
///
/// [`describe`]: Model::describe
pub trait Model: Clone + Send + Sync + 'static {
    /// Name of the backing table.
    const TABLE_NAME: &'static str;

    /// Declares fields and relationships.
    fn describe(model: &mut ModelBuilder);

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// The current values of every declared field, keyed by column name.
    fn values(&self) -> ValueRecord;

    /// Builds a record from the values of its declared fields. Relation slots
    /// start unloaded and the metadata is filled in by the engine.
    fn load(record: ValueRecord) -> Result<Self>;

    /// Returns the slot holding the relationship named `name`.
    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn Relation> {
        let _ = name;
        None
    }
}

/// Where a record is in its lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Not yet inserted.
    #[default]
    Transient,

    /// Inserted and not deleted since.
    Persisted,

    /// Deleted. The record can no longer be saved or deleted.
    Deleted,
}

/// Engine-managed state embedded in every record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordMeta {
    pub(crate) id: Option<i64>,
    pub(crate) created_at: Option<Timestamp>,
    pub(crate) updated_at: Option<Timestamp>,
    pub(crate) hash: Option<String>,
    pub(crate) state: RecordState,
}

impl RecordMeta {
    /// The identifier assigned on insert.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Content hash of the last stored version of the record.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn is_persisted(&self) -> bool {
        self.state == RecordState::Persisted
    }

    /// Moves the managed columns out of a row read from the database.
    /// Relationship queries do not select `Hash`; it is optional here.
    pub(crate) fn take_from(record: &mut ValueRecord) -> Result<RecordMeta> {
        let hash = if record.contains(HASH) {
            record.take::<Option<String>>(HASH)?
        } else {
            None
        };

        Ok(RecordMeta {
            id: Some(record.take(ID)?),
            created_at: Some(record.take(CREATED_AT)?),
            updated_at: Some(record.take(UPDATED_AT)?),
            hash,
            state: RecordState::Persisted,
        })
    }
}

/// Builds a `M` from a full row: managed columns and declared fields.
pub(crate) fn instantiate<M: Model>(mut record: ValueRecord) -> Result<M> {
    let meta = RecordMeta::take_from(&mut record)?;
    let mut model = M::load(record)?;
    *model.meta_mut() = meta;
    Ok(model)
}
