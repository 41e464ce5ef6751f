use super::ColumnRef;

use rowmap_core::stmt::Value;

/// A WHERE clause. Values are always bound as parameters.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(ColumnRef, Value),

    /// The list is never empty.
    In(ColumnRef, Vec<Value>),
}
