use super::{ColumnRef, Filter, Statement};
use crate::Name;

use rowmap_core::{
    schema::{ModelSchema, ID},
    stmt::{Value, ValueRecord},
    Result,
};

#[derive(Debug, Clone)]
pub struct Update {
    pub table: Name,

    pub assignments: Vec<(Name, Value)>,

    pub filter: Filter,
}

impl Statement {
    /// Rewrites the updatable columns of the row with the given `Id`.
    pub fn update_by_id(schema: &ModelSchema, record: &ValueRecord, id: i64) -> Result<Statement> {
        let table = Name::new(&schema.table)?;

        let assignments = schema
            .updatable_fields()
            .map(|field| {
                let value = record.get(&field.name).cloned().unwrap_or_default();
                Ok((Name::new(&field.name)?, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Update {
            table,
            assignments,
            filter: Filter::Eq(ColumnRef::new(Name::new(ID)?), Value::I64(id)),
        }
        .into())
    }
}
