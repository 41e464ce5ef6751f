mod name;
pub use name::{is_valid_identifier, Name};

pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;

mod ty;
pub use ty::{map_type, quote_literal};

pub use rowmap_core::driver::Flavor;
