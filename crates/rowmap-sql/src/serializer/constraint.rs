use super::{Comma, Formatter, Params, ToSql};
use crate::{quote_literal, stmt::TableConstraint};

impl ToSql for &TableConstraint {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            TableConstraint::Unique(column) => fmt!(f, "UNIQUE (" column ")"),
            TableConstraint::Index { name, column } => fmt!(f, "INDEX " name " (" column ")"),
            TableConstraint::Check(expr) => fmt!(f, "CHECK (" expr ")"),
            TableConstraint::CheckIn { column, values } => {
                let flavor = f.serializer.flavor;
                let literals: Vec<_> = values.iter().map(|v| quote_literal(v, flavor)).collect();
                fmt!(f, "CHECK (" column " IN (" Comma(&literals) "))");
            }
            TableConstraint::CheckNonNegative(column) => fmt!(f, "CHECK (" column " >= 0)"),
            TableConstraint::ForeignKey {
                column,
                table,
                references,
            } => fmt!(
                f,
                "FOREIGN KEY (" column ") REFERENCES " table " (" references ")"
            ),
        }
    }
}
