use super::{
    is_managed_column, Association, DefaultValue, FieldDescriptor, ForeignKey, ModelRef,
    ModelSchema, Navigation, Relationship, SemanticType, CREATED_AT, HASH, HASH_LEN, ID,
    UPDATED_AT,
};
use crate::{stmt::Value, Error, Result};

use std::collections::HashSet;

/// Collects the field and relationship declarations of one record type.
///
/// ```ignore
/// fn describe(model: &mut ModelBuilder) {
///     model.field("email", SemanticType::String).max_length(100).unique();
///     model.field("user_id", SemanticType::BigInt).references("users");
///     model.has_many::<Post>("posts", "user_id");
/// }
/// ```
#[derive(Debug)]
pub struct ModelBuilder {
    table: String,
    fields: Vec<FieldDescriptor>,
    relationships: Vec<Relationship>,
}

/// Sets the constraints of a single field.
#[derive(Debug)]
pub struct FieldBuilder<'a> {
    field: &'a mut FieldDescriptor,
}

impl ModelBuilder {
    pub fn new(table: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            table: table.into(),
            fields: vec![],
            relationships: vec![],
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declares a column.
    pub fn field(&mut self, name: impl Into<String>, ty: SemanticType) -> FieldBuilder<'_> {
        let index = self.fields.len();
        self.fields.push(FieldDescriptor::new(name, ty));
        FieldBuilder {
            field: &mut self.fields[index],
        }
    }

    /// Declares a navigation to a `T` referenced by the local foreign-key
    /// field `foreign_key`.
    pub fn has_one<T: 'static>(
        &mut self,
        name: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.relationships.push(Relationship::OneToOne {
            name: name.into(),
            target: ModelRef::of::<T>(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    /// Declares the collection of `T` records whose `remote_key` column
    /// references this record.
    pub fn has_many<T: 'static>(
        &mut self,
        name: impl Into<String>,
        remote_key: impl Into<String>,
    ) -> &mut Self {
        self.relationships.push(Relationship::OneToMany {
            name: name.into(),
            target: ModelRef::of::<T>(),
            remote_key: remote_key.into(),
        });
        self
    }

    /// Declares the collection of `T` records linked through an association
    /// table.
    pub fn many_to_many<T: 'static>(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        source_key: impl Into<String>,
        target_key: impl Into<String>,
    ) -> &mut Self {
        self.relationships.push(Relationship::ManyToMany {
            name: name.into(),
            target: ModelRef::of::<T>(),
            association: Association {
                table: table.into(),
                source_key: source_key.into(),
                target_key: target_key.into(),
            },
        });
        self
    }

    /// Validates the declarations and adds the engine-managed columns.
    pub fn build(self) -> Result<ModelSchema> {
        let ModelBuilder {
            table,
            fields: declared,
            relationships,
        } = self;

        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(declared.len() + 4);

        let mut id = FieldDescriptor::new(ID, SemanticType::BigInt);
        id.primary_key = true;
        id.auto_increment = true;
        fields.push(id);

        for mut field in declared {
            verify_field(&table, &mut field)?;

            if !names.insert(field.name.to_ascii_lowercase()) {
                return Err(Error::configuration(format!(
                    "`{table}.{}` is declared more than once",
                    field.name
                )));
            }

            fields.push(field);
        }

        fields.push(FieldDescriptor::new(CREATED_AT, SemanticType::Timestamp));
        fields.push(FieldDescriptor::new(UPDATED_AT, SemanticType::Timestamp));

        let mut hash = FieldDescriptor::new(HASH, SemanticType::String);
        hash.max_length = HASH_LEN;
        hash.fixed_length = true;
        fields.push(hash);

        let schema = ModelSchema {
            table,
            fields,
            relationships,
        };

        verify_relationships(&schema)?;

        Ok(schema)
    }
}

fn verify_field(table: &str, field: &mut FieldDescriptor) -> Result<()> {
    let name = field.name.clone();

    if is_managed_column(&name) {
        return Err(Error::configuration(format!(
            "`{table}.{name}` uses a column name reserved for engine-managed columns"
        )));
    }

    if field.primary_key || field.auto_increment {
        return Err(Error::configuration(format!(
            "`{table}.{name}`: only the surrogate `Id` column can be a primary key"
        )));
    }

    if !field.enum_values.is_empty() && field.ty != SemanticType::String {
        return Err(Error::configuration(format!(
            "`{table}.{name}`: enumerated values require a string field"
        )));
    }

    if field.unsigned && !field.ty.is_numeric() {
        return Err(Error::configuration(format!(
            "`{table}.{name}`: only numeric fields can be unsigned"
        )));
    }

    if let Some(fk) = &field.foreign_key {
        if fk.table.is_empty() {
            return Err(Error::configuration(format!(
                "`{table}.{name}` names a navigation but references no table"
            )));
        }

        if !matches!(field.ty, SemanticType::Int | SemanticType::BigInt) {
            return Err(Error::configuration(format!(
                "`{table}.{name}`: foreign keys must be integer fields"
            )));
        }
    }

    match field.default.take() {
        Some(DefaultValue::Literal(value)) => {
            let value = value.coerce(&field.ty).map_err(|err| {
                err.context(Error::configuration(format!(
                    "invalid default for `{table}.{name}`"
                )))
            })?;

            if value.is_null() && !field.nullable {
                return Err(Error::configuration(format!(
                    "`{table}.{name}` is not nullable but defaults to NULL"
                )));
            }

            if let Value::String(s) = &value {
                if !field.enum_values.is_empty() && !field.enum_values.contains(s) {
                    return Err(Error::configuration(format!(
                        "`{table}.{name}` defaults to {s:?}, which is not an allowed value"
                    )));
                }
            }

            let value = field.normalize(value);
            field.default = Some(DefaultValue::Literal(value));
        }
        Some(default) => {
            if field.ty != SemanticType::Timestamp {
                return Err(Error::configuration(format!(
                    "`{table}.{name}`: current timestamp defaults require a timestamp field"
                )));
            }
            field.default = Some(default);
        }
        None => {}
    }

    Ok(())
}

fn verify_relationships(schema: &ModelSchema) -> Result<()> {
    let mut names = HashSet::new();
    let table = &schema.table;

    for rel in &schema.relationships {
        if !names.insert(rel.name()) {
            return Err(Error::configuration(format!(
                "relationship `{table}.{}` is declared more than once",
                rel.name()
            )));
        }

        if let Relationship::OneToOne { name, foreign_key, .. } = rel {
            let Some(field) = schema.declared_fields().find(|f| f.name == *foreign_key) else {
                return Err(Error::configuration(format!(
                    "relationship `{table}.{name}` uses foreign key `{foreign_key}`, which is not a field"
                )));
            };

            if let Some(ForeignKey {
                navigation: Navigation::Named(navigation),
                ..
            }) = &field.foreign_key
            {
                if navigation != name {
                    return Err(Error::configuration(format!(
                        "`{table}.{foreign_key}` navigates to `{navigation}` but relationship `{name}` also uses it"
                    )));
                }
            }
        }
    }

    Ok(())
}

impl FieldBuilder<'_> {
    pub fn nullable(self) -> Self {
        self.field.nullable = true;
        self
    }

    pub fn max_length(self, max_length: u32) -> Self {
        self.field.max_length = max_length;
        self
    }

    pub fn precision(self, precision: u32, scale: u32) -> Self {
        self.field.precision = precision;
        self.field.scale = scale;
        self
    }

    pub fn unsigned(self) -> Self {
        self.field.unsigned = true;
        self
    }

    pub fn unique(self) -> Self {
        self.field.unique = true;
        self
    }

    pub fn indexed(self) -> Self {
        self.field.indexed = true;
        self
    }

    /// Adds a check constraint. The expression is emitted verbatim.
    pub fn check(self, expr: impl Into<String>) -> Self {
        self.field.check = Some(expr.into());
        self
    }

    pub fn enum_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn default(self, value: impl Into<Value>) -> Self {
        self.field.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    pub fn default_current_timestamp(self) -> Self {
        self.field.default = Some(DefaultValue::CurrentTimestamp);
        self
    }

    pub fn default_current_timestamp_on_update(self) -> Self {
        self.field.default = Some(DefaultValue::CurrentTimestampOnUpdate);
        self
    }

    /// References the `Id` column of `table`.
    pub fn references(self, table: impl Into<String>) -> Self {
        self.references_column(table, ID)
    }

    pub fn references_column(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        let navigation = match self.field.foreign_key.take() {
            Some(fk) => fk.navigation,
            None => Navigation::Convention,
        };
        self.field.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
            navigation,
        });
        self
    }

    /// Names the relationship slot that receives the referenced record.
    pub fn navigation(self, name: impl Into<String>) -> Self {
        self.set_navigation(Navigation::Named(name.into()))
    }

    /// The foreign key is not navigated.
    pub fn no_navigation(self) -> Self {
        self.set_navigation(Navigation::None)
    }

    fn set_navigation(self, navigation: Navigation) -> Self {
        match &mut self.field.foreign_key {
            Some(fk) => fk.navigation = navigation,
            None => {
                self.field.foreign_key = Some(ForeignKey {
                    table: String::new(),
                    column: ID.to_string(),
                    navigation,
                })
            }
        }
        self
    }
}
