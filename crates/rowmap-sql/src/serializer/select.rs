use super::{Comma, Formatter, Params, ToSql};
use crate::stmt::{Join, Select, SelectItem, TableRef};

impl ToSql for &Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "SELECT ");

        if self.distinct {
            fmt!(f, "DISTINCT ");
        }

        let from = &self.from;
        fmt!(f, Comma(&self.columns) " FROM " from);

        for join in &self.joins {
            join.to_sql(f);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if let Some(order_by) = &self.order_by {
            fmt!(f, " ORDER BY " order_by);
        }
    }
}

impl ToSql for &SelectItem {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, &self.column);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS " alias);
        }
    }
}

impl ToSql for &TableRef {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, &self.name);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS " alias);
        }
    }
}

impl ToSql for &Join {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let Join {
            table,
            left,
            right,
            outer,
        } = self;
        let kind = if *outer { " LEFT JOIN " } else { " JOIN " };
        fmt!(f, kind table " ON " left " = " right);
    }
}
