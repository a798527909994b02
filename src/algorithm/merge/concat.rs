//! Row-wise concatenation of joined segments
//!
//! Segments may carry different cancer columns. The output schema is the
//! union of all columns in first-seen order; a column a segment lacks is
//! filled with nulls for that segment's rows.

use std::sync::Arc;

use anyhow::Context;
use arrow::array::ArrayRef;
use arrow::compute::{concat_batches, kernels::cast};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::debug;

use crate::error::{Error, Result};
use crate::utils::arrow::{is_numeric, null_column};

/// Output type of a column seen with the given types
///
/// Identical types are kept. Numeric types widen to `Float64`; any other
/// mix falls back to `Utf8`. `Null` columns never decide the type.
#[must_use]
pub fn unify_types<'a>(types: impl IntoIterator<Item = &'a DataType>) -> DataType {
    let distinct: Vec<&DataType> = types
        .into_iter()
        .filter(|t| **t != DataType::Null)
        .unique()
        .collect();
    match distinct.as_slice() {
        [] => DataType::Null,
        [only] => (*only).clone(),
        many if many.iter().all(|t| is_numeric(t)) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Union schema of a set of batches
#[must_use]
pub fn union_schema(batches: &[RecordBatch]) -> Schema {
    let schemas: Vec<_> = batches.iter().map(RecordBatch::schema).collect();
    let names: Vec<String> = schemas
        .iter()
        .flat_map(|s| s.fields().iter().map(|f| f.name().clone()))
        .unique()
        .collect();

    let fields: Vec<Field> = names
        .into_iter()
        .map(|name| {
            let data_type = unify_types(
                schemas
                    .iter()
                    .filter_map(|s| s.field_with_name(&name).ok())
                    .map(Field::data_type),
            );
            Field::new(name, data_type, true)
        })
        .collect();
    Schema::new(fields)
}

/// Concatenate batches under their union schema, preserving row order
///
/// # Errors
/// Returns an error if no batches are given or a column cannot be cast to
/// its unified type
pub fn concat_tables(batches: &[RecordBatch]) -> Result<RecordBatch> {
    if batches.is_empty() {
        return Err(Error::InvalidConfig("nothing to concatenate".into()).into());
    }

    let schema = Arc::new(union_schema(batches));
    let aligned = batches
        .iter()
        .map(|batch| align_batch(batch, &schema))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Concatenating {} segments into {} columns",
        aligned.len(),
        schema.fields().len()
    );
    Ok(concat_batches(&schema, &aligned)?)
}

/// Reorder, cast and null-fill one batch to the target schema
fn align_batch(batch: &RecordBatch, schema: &Arc<Schema>) -> Result<RecordBatch> {
    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            match batch.schema().index_of(field.name()) {
                Ok(idx) => {
                    let column = batch.column(idx);
                    if column.data_type() == field.data_type() {
                        Ok(Arc::clone(column))
                    } else {
                        cast::cast(column, field.data_type())
                            .map_err(Error::Arrow)
                            .with_context(|| {
                                format!(
                                    "Cannot cast column '{}' from {:?} to {:?}",
                                    field.name(),
                                    column.data_type(),
                                    field.data_type()
                                )
                            })
                    }
                }
                Err(_) => Ok(null_column(field.data_type(), batch.num_rows())),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordBatch::try_new(Arc::clone(schema), columns)?)
}
