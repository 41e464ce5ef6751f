use super::{Comma, Formatter, Params, ToSql};
use crate::stmt::{CreateIndex, CreateTable, Delete, Insert, Statement, Update};

use rowmap_core::driver::Flavor;

impl ToSql for &Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::LastInsertId => {
                let func = match f.serializer.flavor {
                    Flavor::Mysql => "LAST_INSERT_ID()",
                    Flavor::Sqlite => "last_insert_rowid()",
                };
                fmt!(f, "SELECT " func);
            }
        }
    }
}

impl ToSql for &CreateIndex {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let CreateIndex { name, on, column } = self;
        fmt!(f, "CREATE INDEX IF NOT EXISTS " name " ON " on " (" column ")");
    }
}

impl ToSql for &CreateTable {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let definitions = self
            .columns
            .iter()
            .map(Definition::Column)
            .chain(self.constraints.iter().map(Definition::Constraint));

        let name = &self.name;
        fmt!(f, "CREATE TABLE IF NOT EXISTS " name " (" Comma(definitions) ")");
    }
}

enum Definition<'a> {
    Column(&'a crate::stmt::ColumnDef),
    Constraint(&'a crate::stmt::TableConstraint),
}

impl ToSql for Definition<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Definition::Column(column) => column.to_sql(f),
            Definition::Constraint(constraint) => constraint.to_sql(f),
        }
    }
}

impl ToSql for &Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let returning = self
            .returning
            .as_ref()
            .map(|column| (" RETURNING ", column));

        let table = &self.table;
        fmt!(
            f,
            "INSERT INTO " table " (" Comma(&self.columns) ") VALUES (" Comma(&self.values) ")"
            returning
        );
    }
}

impl ToSql for &Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let assignments = self
            .assignments
            .iter()
            .map(|(column, value)| (column, " = ", value));

        let Update { table, filter, .. } = self;
        fmt!(f, "UPDATE " table " SET " Comma(assignments) " WHERE " filter);
    }
}

impl ToSql for &Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let Delete { from, filter } = self;
        fmt!(f, "DELETE FROM " from " WHERE " filter);
    }
}

impl<A: ToSql, B: ToSql> ToSql for (A, B) {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, self.0 self.1);
    }
}

impl<A: ToSql, B: ToSql, C: ToSql> ToSql for (A, B, C) {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, self.0 self.1 self.2);
    }
}
