use super::{Comma, Formatter, Params, ToSql};
use crate::stmt::{ColumnRef, Filter};

impl ToSql for &Filter {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Filter::Eq(column, value) => fmt!(f, column " = " value),
            Filter::In(column, values) => fmt!(f, column " IN (" Comma(values) ")"),
        }
    }
}

impl ToSql for &ColumnRef {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if let Some(table) = &self.table {
            fmt!(f, table ".");
        }
        fmt!(f, &self.name);
    }
}
