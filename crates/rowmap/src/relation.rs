mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

use crate::Result;

use std::any::Any;

/// A slot on a record that holds resolved related records.
///
/// The resolver materializes related rows through the registry without
/// knowing their static type and hands them to the slot, which downcasts
/// them.
pub trait Relation: Send {
    /// Stores the related records, replacing anything loaded before.
    fn assign(&mut self, records: Vec<Box<dyn Any + Send + Sync>>) -> Result<()>;

    fn unload(&mut self);

    fn is_loaded(&self) -> bool;
}

fn downcast<T: 'static>(record: Box<dyn Any + Send + Sync>) -> Result<Box<T>> {
    record.downcast::<T>().map_err(|_| {
        rowmap_core::Error::configuration(format!(
            "relationship slot holds `{}` but received a record of another type",
            std::any::type_name::<T>()
        ))
    })
}
