use super::{ColumnDef, Statement};
use crate::Name;

use rowmap_core::{
    driver::Flavor,
    schema::{ModelSchema, SemanticType},
    Result,
};

/// A `CREATE TABLE IF NOT EXISTS` statement
#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Table-level constraints, emitted after the columns
    pub constraints: Vec<TableConstraint>,
}

#[derive(Debug, Clone)]
pub enum TableConstraint {
    Unique(Name),

    /// Inline index definition, only used by dialects that support it
    Index { name: Name, column: Name },

    /// Opaque check expression
    Check(String),

    /// Column must hold one of the listed values
    CheckIn { column: Name, values: Vec<String> },

    /// Column must not be negative
    CheckNonNegative(Name),

    ForeignKey {
        column: Name,
        table: Name,
        references: Name,
    },
}

impl Statement {
    /// Builds the table definition of a record type.
    ///
    /// Fails with an invalid identifier error if the table or any column
    /// name does not follow the identifier grammar, and with an unsupported
    /// type error if a field has no column type in `flavor`.
    pub fn create_table(schema: &ModelSchema, flavor: Flavor) -> Result<Statement> {
        let name = Name::new(&schema.table)?;

        let columns = schema
            .fields
            .iter()
            .map(|field| ColumnDef::from_field(field, flavor))
            .collect::<Result<Vec<_>>>()?;

        let mut constraints = vec![];

        for field in &schema.fields {
            let column = Name::new(&field.name)?;

            if field.unique {
                constraints.push(TableConstraint::Unique(column.clone()));
            }

            if field.indexed && flavor.inline_indices() {
                constraints.push(TableConstraint::Index {
                    name: super::create_index::index_name(&name, &column),
                    column: column.clone(),
                });
            }

            if let Some(check) = &field.check {
                constraints.push(TableConstraint::Check(check.clone()));
            }

            if !field.enum_values.is_empty() {
                constraints.push(TableConstraint::CheckIn {
                    column: column.clone(),
                    values: field.enum_values.clone(),
                });
            }

            let native_unsigned = flavor.supports_unsigned()
                && matches!(field.ty, SemanticType::Int | SemanticType::BigInt);

            if field.unsigned && !native_unsigned {
                constraints.push(TableConstraint::CheckNonNegative(column.clone()));
            }

            if let Some(fk) = &field.foreign_key {
                constraints.push(TableConstraint::ForeignKey {
                    column,
                    table: Name::new(&fk.table)?,
                    references: Name::new(&fk.column)?,
                });
            }
        }

        Ok(CreateTable {
            name,
            columns,
            constraints,
        }
        .into())
    }
}
