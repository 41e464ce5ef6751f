use std::any::TypeId;

/// Identifies a record type without depending on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRef {
    pub id: TypeId,
    pub name: &'static str,
}

impl ModelRef {
    pub fn of<T: 'static>() -> ModelRef {
        ModelRef {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// A navigable association between two record types.
///
/// Self-referential associations are any variant whose target is the owning
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    /// The owner holds a foreign key to the target's `Id`.
    OneToOne {
        name: String,
        target: ModelRef,
        foreign_key: String,
    },

    /// The target holds a foreign key to the owner's `Id`.
    OneToMany {
        name: String,
        target: ModelRef,
        remote_key: String,
    },

    /// Owner and target are linked through an association table.
    ManyToMany {
        name: String,
        target: ModelRef,
        association: Association,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub table: String,

    /// Column referencing the owner.
    pub source_key: String,

    /// Column referencing the target.
    pub target_key: String,
}

impl Relationship {
    pub fn name(&self) -> &str {
        match self {
            Relationship::OneToOne { name, .. }
            | Relationship::OneToMany { name, .. }
            | Relationship::ManyToMany { name, .. } => name,
        }
    }

    pub fn target(&self) -> &ModelRef {
        match self {
            Relationship::OneToOne { target, .. }
            | Relationship::OneToMany { target, .. }
            | Relationship::ManyToMany { target, .. } => target,
        }
    }

    pub fn is_one_to_one(&self) -> bool {
        matches!(self, Relationship::OneToOne { .. })
    }
}
