use super::Statement;
use crate::Name;

use rowmap_core::{
    driver::Flavor,
    schema::{ModelSchema, ID},
    stmt::{Value, ValueRecord},
    Result,
};

#[derive(Debug, Clone)]
pub struct Insert {
    /// Table being inserted into
    pub table: Name,

    pub columns: Vec<Name>,

    /// One value per column
    pub values: Vec<Value>,

    /// Generated column returned by the statement
    pub returning: Option<Name>,
}

impl Statement {
    /// Inserts one row. Every insertable column of the schema is written;
    /// columns absent from `record` are bound as `NULL`.
    ///
    /// Dialects without `RETURNING` follow this statement with
    /// [`Statement::last_insert_id`] on the same connection.
    pub fn insert(schema: &ModelSchema, record: &ValueRecord, flavor: Flavor) -> Result<Statement> {
        let table = Name::new(&schema.table)?;
        let mut columns = vec![];
        let mut values = vec![];

        for field in schema.insertable_fields() {
            columns.push(Name::new(&field.name)?);
            values.push(record.get(&field.name).cloned().unwrap_or_default());
        }

        let returning = if flavor.supports_returning() {
            Some(Name::new(ID)?)
        } else {
            None
        };

        Ok(Insert {
            table,
            columns,
            values,
            returning,
        }
        .into())
    }
}
