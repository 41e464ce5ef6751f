mod primitive;
pub use primitive::Primitive;

pub mod timestamp;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
