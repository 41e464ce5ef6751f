use super::{Formatter, Params, ToSql};
use crate::Name;

use rowmap_core::driver::Flavor;

/// A quoted identifier.
pub(super) struct Ident<'a>(pub(super) &'a Name);

impl ToSql for Ident<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        // Names never contain quote characters, so no escaping is needed.
        let quote = match f.serializer.flavor {
            Flavor::Mysql => '`',
            Flavor::Sqlite => '"',
        };

        f.dst.push(quote);
        f.dst.push_str(self.0.as_str());
        f.dst.push(quote);
    }
}

impl<'a> ToSql for &'a Name {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        Ident(self).to_sql(f);
    }
}
