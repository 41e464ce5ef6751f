use super::Statement;
use crate::Name;

use rowmap_core::{driver::Flavor, schema::ModelSchema, Result};
use sha2::{Digest, Sha256};

/// A `CREATE INDEX IF NOT EXISTS` statement
#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index
    pub name: Name,

    /// Indexed table
    pub on: Name,

    /// Indexed column
    pub column: Name,
}

impl Statement {
    /// Index definitions that are not part of the table definition.
    ///
    /// Empty for dialects that declare indices inline.
    pub fn create_indices(schema: &ModelSchema, flavor: Flavor) -> Result<Vec<Statement>> {
        if flavor.inline_indices() {
            return Ok(vec![]);
        }

        let on = Name::new(&schema.table)?;

        schema
            .fields
            .iter()
            .filter(|field| field.indexed)
            .map(|field| {
                let column = Name::new(&field.name)?;
                Ok(CreateIndex {
                    name: index_name(&on, &column),
                    on: on.clone(),
                    column,
                }
                .into())
            })
            .collect()
    }
}

/// Hex digits of the digest suffix on shortened index names.
const DIGEST_LEN: usize = 8;

/// `ix_{table}_{column}`. Names longer than [`Name::MAX_LEN`] are cut short
/// and end in a digest of the full name, so they stay unique and stable.
pub(super) fn index_name(table: &Name, column: &Name) -> Name {
    let name = format!("ix_{table}_{column}");
    if name.len() <= Name::MAX_LEN {
        return Name::generated(name);
    }

    let digest = Sha256::digest(name.as_bytes());
    let suffix: String = digest
        .iter()
        .take(DIGEST_LEN / 2)
        .map(|byte| format!("{byte:02x}"))
        .collect();

    let keep = Name::MAX_LEN - DIGEST_LEN - 1;
    Name::generated(format!("{}_{suffix}", &name[..keep]))
}
