mod cache;
pub use cache::IdentityCache;

pub mod db;
pub use db::{connect, Db};

mod hash;
pub use hash::content_hash;

mod model;
pub use model::{Model, RecordMeta, RecordState};

pub mod registry;
pub use registry::{NavigationConvention, Registry};

pub mod relation;
pub use relation::{HasMany, HasOne, Relation};

mod resolve;

mod row;

pub use rowmap_core::{bail, driver, err, schema, stmt, Error, Result};
