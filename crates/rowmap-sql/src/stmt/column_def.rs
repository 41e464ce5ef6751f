use crate::{map_type, Name};

use rowmap_core::{driver::Flavor, schema::FieldDescriptor, Result};

#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Name of the column
    pub name: Name,

    /// Type clause, including nullability and default
    pub ty: String,

    pub primary_key: bool,

    pub auto_increment: bool,
}

impl ColumnDef {
    pub(crate) fn from_field(field: &FieldDescriptor, flavor: Flavor) -> Result<ColumnDef> {
        Ok(ColumnDef {
            name: Name::new(&field.name)?,
            ty: map_type(field, flavor)?,
            primary_key: field.primary_key,
            auto_increment: field.auto_increment,
        })
    }
}
