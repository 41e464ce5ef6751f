use super::{ColumnRef, Filter, Statement};
use crate::Name;

use rowmap_core::{
    schema::{ModelSchema, ID},
    stmt::Value,
    Result,
};

#[derive(Debug, Clone)]
pub struct Delete {
    /// Table to delete from
    pub from: Name,

    pub filter: Filter,
}

impl Statement {
    pub fn delete_by_id(schema: &ModelSchema, id: i64) -> Result<Statement> {
        Ok(Delete {
            from: Name::new(&schema.table)?,
            filter: Filter::Eq(ColumnRef::new(Name::new(ID)?), Value::I64(id)),
        }
        .into())
    }
}
