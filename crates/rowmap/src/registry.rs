//! Metadata of every registered record type.
//!
//! The registry is built once, when the [`Db`](crate::Db) is built, and is
//! shared by every handle built from it. Besides collecting each type's
//! [`ModelSchema`], building the registry links foreign keys to their
//! navigation slots and checks that every relationship points at a
//! registered type.

use crate::{model::instantiate, Model, Result};

use rowmap_core::{
    schema::{ForeignKey, ModelBuilder, ModelRef, ModelSchema, Navigation, Relationship},
    stmt::ValueRecord,
    Error,
};

use indexmap::IndexMap;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

type LoadFn = fn(ValueRecord) -> Result<Box<dyn Any + Send + Sync>>;

/// All registered record types, in registration order.
#[derive(Debug)]
pub struct Registry {
    entries: IndexMap<TypeId, ModelEntry>,
    by_table: HashMap<String, TypeId>,
    convention: NavigationConvention,
}

/// Registry entry of one record type.
pub struct ModelEntry {
    model: ModelRef,
    schema: ModelSchema,
    load: LoadFn,
}

/// Derives navigation names from foreign-key field names.
///
/// A foreign key `author_id` navigates to a slot named `author` with the
/// default `_id` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationConvention {
    suffix: String,
}

/// A record type waiting to be registered.
#[derive(Clone, Copy)]
pub(crate) struct Registration {
    model: ModelRef,
    table: &'static str,
    describe: fn(&mut ModelBuilder),
    load: LoadFn,
}

impl Registry {
    pub(crate) fn build(
        registrations: &[Registration],
        convention: NavigationConvention,
    ) -> Result<Registry> {
        let mut entries: IndexMap<TypeId, ModelEntry> = IndexMap::new();
        let mut by_table: HashMap<String, TypeId> = HashMap::new();

        for registration in registrations {
            if entries.contains_key(&registration.model.id) {
                continue;
            }

            let mut builder = ModelBuilder::new(registration.table);
            (registration.describe)(&mut builder);
            let schema = builder
                .build()
                .map_err(|err| err.context(format!("registering `{}`", registration.model.name)))?;

            if let Some(other) = by_table.insert(schema.table.clone(), registration.model.id) {
                let other = &entries[&other];
                return Err(Error::configuration(format!(
                    "`{}` and `{}` are both mapped to table `{}`",
                    other.type_name(),
                    registration.model.name,
                    schema.table
                )));
            }

            entries.insert(
                registration.model.id,
                ModelEntry {
                    model: registration.model,
                    schema,
                    load: registration.load,
                },
            );
        }

        let mut registry = Registry {
            entries,
            by_table,
            convention,
        };

        registry.link_navigations()?;
        registry.verify_relationships()?;

        Ok(registry)
    }

    /// Field and relationship metadata of `M`.
    pub fn describe<M: Model>(&self) -> Result<&ModelSchema> {
        self.entry::<M>().map(|entry| &entry.schema)
    }

    pub fn relationships_of<M: Model>(&self) -> Result<&[Relationship]> {
        self.describe::<M>().map(|schema| &schema.relationships[..])
    }

    /// The record type mapped to `table`.
    pub fn type_for_table_name(&self, table: &str) -> Option<&ModelEntry> {
        self.by_table
            .get(table)
            .and_then(|type_id| self.entries.get(type_id))
    }

    pub fn entry_by_type_id(&self, type_id: TypeId) -> Option<&ModelEntry> {
        self.entries.get(&type_id)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.values()
    }

    pub fn convention(&self) -> &NavigationConvention {
        &self.convention
    }

    fn entry<M: Model>(&self) -> Result<&ModelEntry> {
        self.entries.get(&TypeId::of::<M>()).ok_or_else(|| {
            Error::configuration(format!(
                "`{}` is not registered",
                std::any::type_name::<M>()
            ))
        })
    }

    /// Adds a one-to-one relationship for every foreign key that has no
    /// explicit one.
    fn link_navigations(&mut self) -> Result<()> {
        let mut synthesized = vec![];

        for (type_id, entry) in &self.entries {
            let schema = &entry.schema;

            for field in schema.declared_fields() {
                let Some(ForeignKey {
                    table, navigation, ..
                }) = &field.foreign_key
                else {
                    continue;
                };

                if schema.one_to_one_for(&field.name).is_some() {
                    continue;
                }

                let name = match navigation {
                    Navigation::None => continue,
                    Navigation::Named(name) => name.clone(),
                    Navigation::Convention => self
                        .convention
                        .navigation_name(&field.name)
                        .ok_or_else(|| {
                            Error::configuration(format!(
                                "foreign key `{}.{}` does not end in `{}`; name its navigation explicitly",
                                schema.table, field.name, self.convention.suffix
                            ))
                        })?,
                };

                let target = self.type_for_table_name(table).ok_or_else(|| {
                    Error::configuration(format!(
                        "foreign key `{}.{}` references `{table}`, which is not a registered table",
                        schema.table, field.name
                    ))
                })?;

                if schema.relationship(&name).is_some() {
                    return Err(Error::configuration(format!(
                        "navigation `{}.{name}` for foreign key `{}` conflicts with a declared relationship",
                        schema.table, field.name
                    )));
                }

                synthesized.push((
                    *type_id,
                    Relationship::OneToOne {
                        name,
                        target: target.model,
                        foreign_key: field.name.clone(),
                    },
                ));
            }
        }

        for (type_id, relationship) in synthesized {
            if let Some(entry) = self.entries.get_mut(&type_id) {
                entry.schema.relationships.push(relationship);
            }
        }

        Ok(())
    }

    fn verify_relationships(&self) -> Result<()> {
        for entry in self.entries.values() {
            let schema = &entry.schema;

            for relationship in &schema.relationships {
                let Some(target) = self.entries.get(&relationship.target().id) else {
                    return Err(Error::configuration(format!(
                        "relationship `{}.{}` targets `{}`, which is not registered",
                        schema.table,
                        relationship.name(),
                        relationship.target().name
                    )));
                };

                match relationship {
                    Relationship::OneToOne { foreign_key, .. } => {
                        let referenced = schema
                            .field(foreign_key)
                            .and_then(|field| field.foreign_key.as_ref());

                        if let Some(referenced) = referenced {
                            if referenced.table != target.schema.table {
                                return Err(Error::configuration(format!(
                                    "relationship `{}.{}` targets `{}` but `{foreign_key}` references `{}`",
                                    schema.table,
                                    relationship.name(),
                                    target.schema.table,
                                    referenced.table
                                )));
                            }
                        }
                    }
                    Relationship::OneToMany { remote_key, .. } => {
                        if target.schema.field(remote_key).is_none() {
                            return Err(Error::configuration(format!(
                                "relationship `{}.{}` uses `{}.{remote_key}`, which is not a field",
                                schema.table,
                                relationship.name(),
                                target.schema.table
                            )));
                        }
                    }
                    Relationship::ManyToMany { .. } => {}
                }
            }
        }

        Ok(())
    }
}

impl ModelEntry {
    pub fn type_name(&self) -> &'static str {
        self.model.name
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// Materializes a record of this type from a full row.
    pub(crate) fn load(&self, record: ValueRecord) -> Result<Box<dyn Any + Send + Sync>> {
        (self.load)(record)
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("type_name", &self.model.name)
            .field("schema", &self.schema)
            .finish()
    }
}

impl NavigationConvention {
    pub fn new(suffix: impl Into<String>) -> NavigationConvention {
        NavigationConvention {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The navigation name for a foreign-key field, or `None` if the field
    /// name does not carry the suffix.
    pub fn navigation_name(&self, field: &str) -> Option<String> {
        field
            .strip_suffix(&self.suffix)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

impl Default for NavigationConvention {
    fn default() -> Self {
        NavigationConvention::new("_id")
    }
}

impl Registration {
    pub(crate) fn of<M: Model>() -> Registration {
        Registration {
            model: ModelRef::of::<M>(),
            table: M::TABLE_NAME,
            describe: M::describe,
            load: load_erased::<M>,
        }
    }
}

fn load_erased<M: Model>(record: ValueRecord) -> Result<Box<dyn Any + Send + Sync>> {
    Ok(Box::new(instantiate::<M>(record)?))
}
