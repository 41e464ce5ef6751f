use crate::{
    db::Conn,
    registry::{ModelEntry, Registry},
    row::read_record,
    Model, Relation, Result,
};

use rowmap_core::{
    schema::{ModelSchema, Relationship, ID},
    Error,
};
use rowmap_sql::stmt::{joined_column_alias, JoinedOne, Statement};

/// Loads every relationship of `record` into its slots. Related records are
/// loaded without their own relationships.
pub(crate) async fn resolve<M: Model>(
    conn: &mut Conn,
    registry: &Registry,
    record: &mut M,
) -> Result<()> {
    let schema = registry.describe::<M>()?;

    let Some(id) = record.meta().id() else {
        return Err(Error::invalid_record_state(format!(
            "relationships of an unsaved `{}` record cannot be loaded",
            schema.table
        )));
    };

    resolve_one_to_one(conn, registry, schema, record, id).await?;

    for relationship in &schema.relationships {
        let target = target_entry(registry, schema, relationship)?;

        let stmt = match relationship {
            Relationship::OneToOne { .. } => continue,
            Relationship::OneToMany { remote_key, .. } => {
                Statement::select_one_to_many(target.schema(), remote_key, id)?
            }
            Relationship::ManyToMany { association, .. } => {
                Statement::select_many_to_many(target.schema(), association, id)?
            }
        };

        let mut related = vec![];
        for mut row in conn.query(&stmt).await? {
            related.push(target.load(read_record(target.schema(), &mut row, None)?)?);
        }

        slot(record, schema, relationship.name())?.assign(related)?;
    }

    Ok(())
}

/// Loads all one-to-one relationships with a single query.
async fn resolve_one_to_one<M: Model>(
    conn: &mut Conn,
    registry: &Registry,
    schema: &ModelSchema,
    record: &mut M,
    id: i64,
) -> Result<()> {
    let mut joined = vec![];
    let mut targets = vec![];

    for relationship in &schema.relationships {
        let Relationship::OneToOne { foreign_key, .. } = relationship else {
            continue;
        };

        let target = target_entry(registry, schema, relationship)?;
        let references = schema
            .field(foreign_key)
            .and_then(|field| field.foreign_key.as_ref())
            .map(|fk| fk.column.as_str())
            .unwrap_or(ID);

        joined.push(JoinedOne {
            foreign_key,
            references,
            target: target.schema(),
        });
        targets.push((relationship.name(), target));
    }

    if joined.is_empty() {
        return Ok(());
    }

    let stmt = Statement::select_one_to_one(schema, &joined, id)?;
    let mut row = conn.query(&stmt).await?.next();

    for (index, (name, target)) in targets.into_iter().enumerate() {
        let mut related = vec![];

        if let Some(row) = &mut row {
            if !row.is_null(&joined_column_alias(index, ID))? {
                related.push(target.load(read_record(target.schema(), row, Some(index))?)?);
            }
        }

        slot(record, schema, name)?.assign(related)?;
    }

    Ok(())
}

fn target_entry<'a>(
    registry: &'a Registry,
    schema: &ModelSchema,
    relationship: &Relationship,
) -> Result<&'a ModelEntry> {
    registry
        .entry_by_type_id(relationship.target().id)
        .ok_or_else(|| {
            Error::configuration(format!(
                "relationship `{}.{}` targets `{}`, which is not registered",
                schema.table,
                relationship.name(),
                relationship.target().name
            ))
        })
}

fn slot<'a, M: Model>(
    record: &'a mut M,
    schema: &ModelSchema,
    name: &str,
) -> Result<&'a mut dyn Relation> {
    record.relation_mut(name).ok_or_else(|| {
        Error::configuration(format!(
            "`{}` declares relationship `{name}` but has no slot for it",
            schema.table
        ))
    })
}
