use super::{Formatter, Params, ToSql};
use crate::stmt::ColumnDef;

use rowmap_core::driver::Flavor;

impl ToSql for &ColumnDef {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let ColumnDef { name, ty, .. } = self;
        fmt!(f, name " " ty);

        if self.primary_key {
            fmt!(f, " PRIMARY KEY");
        }

        if self.auto_increment {
            let clause = match f.serializer.flavor {
                Flavor::Mysql => " AUTO_INCREMENT",
                Flavor::Sqlite => " AUTOINCREMENT",
            };
            fmt!(f, clause);
        }
    }
}
