use rowmap_core::{driver::Row, schema::ModelSchema, stmt::ValueRecord, Result};
use rowmap_sql::stmt::joined_column_alias;

/// Reads the columns of `schema` out of `row`, converting each value to its
/// field's semantic type and canonical form.
///
/// `joined` selects the `r{n}__` aliased columns of a batched one-to-one
/// query. Columns the query did not select are skipped.
pub(crate) fn read_record(
    schema: &ModelSchema,
    row: &mut Row,
    joined: Option<usize>,
) -> Result<ValueRecord> {
    let mut record = ValueRecord::new();

    for field in &schema.fields {
        let column = match joined {
            Some(index) => joined_column_alias(index, &field.name),
            None => field.name.clone(),
        };

        if !row.columns().contains(&column) {
            continue;
        }

        let value = row
            .take(&column)?
            .coerce(&field.ty)
            .map_err(|err| err.context(format!("column `{}.{}`", schema.table, field.name)))?;

        record.set(field.name.clone(), field.normalize(value));
    }

    Ok(record)
}
