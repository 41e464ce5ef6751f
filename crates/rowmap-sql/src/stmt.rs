mod column_def;
pub use column_def::ColumnDef;

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::{CreateTable, TableConstraint};

mod delete;
pub use delete::Delete;

mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{joined_column_alias, ColumnRef, Join, JoinedOne, Select, SelectItem, TableRef};

mod update;
pub use update::Update;

/// A statement ready to be serialized for one SQL dialect.
#[derive(Debug, Clone)]
pub enum Statement {
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    Delete(Delete),
    Insert(Insert),
    Query(Select),
    Update(Update),

    /// Reads the key generated by the last insert on this connection.
    LastInsertId,
}

impl Statement {
    pub fn last_insert_id() -> Statement {
        Statement::LastInsertId
    }

    /// True if the statement produces rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Query(_) | Statement::LastInsertId => true,
            Statement::Insert(insert) => insert.returning.is_some(),
            _ => false,
        }
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Query(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
