use super::{Filter, Statement};
use crate::Name;

use rowmap_core::{
    schema::{Association, FieldDescriptor, ModelSchema, HASH, ID},
    stmt::Value,
    Result,
};

/// A single-table query, optionally joined to related tables.
#[derive(Debug, Clone)]
pub struct Select {
    pub distinct: bool,

    pub columns: Vec<SelectItem>,

    pub from: TableRef,

    pub joins: Vec<Join>,

    pub filter: Option<Filter>,

    /// Sort key, always ascending
    pub order_by: Option<ColumnRef>,
}

#[derive(Debug, Clone)]
pub struct SelectItem {
    pub column: ColumnRef,

    pub alias: Option<Name>,
}

/// A column, optionally qualified by a table alias.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    pub table: Option<Name>,

    pub name: Name,
}

#[derive(Debug, Clone)]
pub struct TableRef {
    pub name: Name,

    pub alias: Option<Name>,
}

/// `[LEFT] JOIN table ON left = right`
#[derive(Debug, Clone)]
pub struct Join {
    pub table: TableRef,

    pub left: ColumnRef,

    pub right: ColumnRef,

    /// Rows of the primary table are kept when nothing matches.
    pub outer: bool,
}

/// One foreign-key navigation resolved by [`Statement::select_one_to_one`].
#[derive(Debug, Clone, Copy)]
pub struct JoinedOne<'a> {
    /// Foreign-key column of the owner
    pub foreign_key: &'a str,

    /// Column of the target the foreign key references
    pub references: &'a str,

    pub target: &'a ModelSchema,
}

/// Alias of `column` of the `index`th joined table in a
/// [`Statement::select_one_to_one`] result.
pub fn joined_column_alias(index: usize, column: &str) -> String {
    format!("r{index}__{column}")
}

impl ColumnRef {
    pub fn new(name: Name) -> ColumnRef {
        ColumnRef { table: None, name }
    }

    pub fn qualified(table: &Name, name: Name) -> ColumnRef {
        ColumnRef {
            table: Some(table.clone()),
            name,
        }
    }
}

impl SelectItem {
    fn column(table: Option<&Name>, name: &str) -> Result<SelectItem> {
        let name = Name::new(name)?;
        Ok(SelectItem {
            column: ColumnRef {
                table: table.cloned(),
                name,
            },
            alias: None,
        })
    }
}

impl TableRef {
    fn new(name: &str) -> Result<TableRef> {
        Ok(TableRef {
            name: Name::new(name)?,
            alias: None,
        })
    }

    fn aliased(name: &str, alias: &str) -> Result<TableRef> {
        Ok(TableRef {
            name: Name::new(name)?,
            alias: Some(Name::generated(alias.to_string())),
        })
    }
}

impl Select {
    fn from_table(schema: &ModelSchema, columns: &[&str]) -> Result<Select> {
        Ok(Select {
            distinct: false,
            columns: columns
                .iter()
                .map(|column| SelectItem::column(None, column))
                .collect::<Result<_>>()?,
            from: TableRef::new(&schema.table)?,
            joins: vec![],
            filter: None,
            order_by: None,
        })
    }

    fn all_columns(schema: &ModelSchema) -> Result<Select> {
        let columns: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        Select::from_table(schema, &columns)
    }

    fn filter_id(mut self, id: i64) -> Result<Select> {
        self.filter = Some(Filter::Eq(ColumnRef::new(Name::new(ID)?), Value::I64(id)));
        Ok(self)
    }

    fn order_by_id(mut self) -> Result<Select> {
        self.order_by = Some(ColumnRef::new(Name::new(ID)?));
        Ok(self)
    }
}

/// Columns materialized for related records. The content hash is never
/// exposed through relationship queries.
fn related_fields(schema: &ModelSchema) -> impl Iterator<Item = &FieldDescriptor> {
    schema.fields.iter().filter(|field| field.name != HASH)
}

impl Statement {
    pub fn select_by_id(schema: &ModelSchema, id: i64) -> Result<Statement> {
        Ok(Select::all_columns(schema)?.filter_id(id)?.into())
    }

    /// Every row of the table, ordered by `Id`.
    pub fn select_all(schema: &ModelSchema) -> Result<Statement> {
        Ok(Select::all_columns(schema)?.order_by_id()?.into())
    }

    /// The stored content hash of one row.
    pub fn select_hash_by_id(schema: &ModelSchema, id: i64) -> Result<Statement> {
        Ok(Select::from_table(schema, &[HASH])?.filter_id(id)?.into())
    }

    /// `(Id, Hash)` of every row, ordered by `Id`.
    pub fn select_hashes(schema: &ModelSchema) -> Result<Statement> {
        Ok(Select::from_table(schema, &[ID, HASH])?.order_by_id()?.into())
    }

    /// Full rows for a set of keys, ordered by `Id`. `ids` must not be empty.
    pub fn select_by_ids(schema: &ModelSchema, ids: &[i64]) -> Result<Statement> {
        debug_assert!(!ids.is_empty());

        let mut select = Select::all_columns(schema)?.order_by_id()?;
        select.filter = Some(Filter::In(
            ColumnRef::new(Name::new(ID)?),
            ids.iter().copied().map(Value::I64).collect(),
        ));
        Ok(select.into())
    }

    /// Loads every record referenced by the owner's foreign keys in one
    /// round trip.
    ///
    /// Each target is left-joined under the alias `r{n}`; its columns are
    /// returned as [`joined_column_alias`]`(n, column)`.
    pub fn select_one_to_one(
        owner: &ModelSchema,
        joined: &[JoinedOne<'_>],
        id: i64,
    ) -> Result<Statement> {
        let owner_alias = Name::generated("o".to_string());
        let mut columns = vec![];
        let mut joins = vec![];

        for (index, joined) in joined.iter().enumerate() {
            let alias = format!("r{index}");
            let table = TableRef::aliased(&joined.target.table, &alias)?;
            let target_alias = Name::generated(alias);

            for field in related_fields(joined.target) {
                let mut item = SelectItem::column(Some(&target_alias), &field.name)?;
                item.alias = Some(Name::generated(joined_column_alias(index, &field.name)));
                columns.push(item);
            }

            joins.push(Join {
                table,
                left: ColumnRef::qualified(&target_alias, Name::new(joined.references)?),
                right: ColumnRef::qualified(&owner_alias, Name::new(joined.foreign_key)?),
                outer: true,
            });
        }

        Ok(Select {
            distinct: false,
            columns,
            from: TableRef {
                name: Name::new(&owner.table)?,
                alias: Some(owner_alias.clone()),
            },
            joins,
            filter: Some(Filter::Eq(
                ColumnRef::qualified(&owner_alias, Name::new(ID)?),
                Value::I64(id),
            )),
            order_by: None,
        }
        .into())
    }

    /// Target rows whose `remote_key` references the owner, ordered by `Id`.
    pub fn select_one_to_many(target: &ModelSchema, remote_key: &str, id: i64) -> Result<Statement> {
        let columns: Vec<_> = related_fields(target).map(|f| f.name.as_str()).collect();
        let mut select = Select::from_table(target, &columns)?.order_by_id()?;
        select.filter = Some(Filter::Eq(
            ColumnRef::new(Name::new(remote_key)?),
            Value::I64(id),
        ));
        Ok(select.into())
    }

    /// Target rows linked to the owner through an association table, without
    /// duplicates, ordered by `Id`.
    pub fn select_many_to_many(
        target: &ModelSchema,
        association: &Association,
        id: i64,
    ) -> Result<Statement> {
        let assoc = Name::generated("a".to_string());
        let related = Name::generated("r".to_string());

        let columns = related_fields(target)
            .map(|field| SelectItem::column(Some(&related), &field.name))
            .collect::<Result<_>>()?;

        Ok(Select {
            distinct: true,
            columns,
            from: TableRef::aliased(&association.table, "a")?,
            joins: vec![Join {
                table: TableRef::aliased(&target.table, "r")?,
                left: ColumnRef::qualified(&related, Name::new(ID)?),
                right: ColumnRef::qualified(&assoc, Name::new(&association.target_key)?),
                outer: false,
            }],
            filter: Some(Filter::Eq(
                ColumnRef::qualified(&assoc, Name::new(&association.source_key)?),
                Value::I64(id),
            )),
            order_by: Some(ColumnRef::qualified(&related, Name::new(ID)?)),
        }
        .into())
    }
}
