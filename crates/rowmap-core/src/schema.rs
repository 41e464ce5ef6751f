mod builder;
pub use builder::{FieldBuilder, ModelBuilder};

mod field;
pub use field::{DefaultValue, FieldDescriptor, ForeignKey, Navigation};

mod model;
pub use model::ModelSchema;

mod relationship;
pub use relationship::{Association, ModelRef, Relationship};

mod ty;
pub use ty::SemanticType;

/// Surrogate primary key column present on every table.
pub const ID: &str = "Id";

/// Set once, when the row is inserted.
pub const CREATED_AT: &str = "CreatedAt";

/// Refreshed on every insert and update.
pub const UPDATED_AT: &str = "UpdatedAt";

/// Content hash used by the identity cache.
pub const HASH: &str = "Hash";

/// Width of the base64 encoded SHA-256 digest stored in [`HASH`].
pub const HASH_LEN: u32 = 44;

/// Returns true if `name` is one of the columns managed by the engine.
pub fn is_managed_column(name: &str) -> bool {
    [ID, CREATED_AT, UPDATED_AT, HASH]
        .iter()
        .any(|managed| managed.eq_ignore_ascii_case(name))
}
