use super::{is_managed_column, FieldDescriptor, Relationship, CREATED_AT, UPDATED_AT};

/// Column and relationship metadata for one record type.
///
/// Fields are ordered: the surrogate `Id` first, then the declared fields in
/// declaration order, then `CreatedAt`, `UpdatedAt`, and `Hash`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub table: String,

    pub fields: Vec<FieldDescriptor>,

    pub relationships: Vec<Relationship>,
}

impl ModelSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The surrogate primary key.
    pub fn primary_key(&self) -> &FieldDescriptor {
        &self.fields[0]
    }

    /// Fields declared by the record type, excluding engine-managed columns.
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| !is_managed_column(&field.name))
    }

    /// Fields covered by the content hash, in hashing order.
    pub fn content_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.declared_fields().chain(
            self.fields
                .iter()
                .filter(|field| field.name == CREATED_AT || field.name == UPDATED_AT),
        )
    }

    /// Columns written by an insert.
    pub fn insertable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| !field.auto_increment)
    }

    /// Columns written by an update. `CreatedAt` is never rewritten.
    pub fn updatable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.insertable_fields()
            .filter(|field| field.name != CREATED_AT)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name() == name)
    }

    /// Returns the one-to-one relationship navigated through `foreign_key`.
    pub fn one_to_one_for(&self, foreign_key: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| {
            matches!(rel, Relationship::OneToOne { foreign_key: fk, .. } if fk == foreign_key)
        })
    }
}
