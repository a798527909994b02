//! Utilities for working with Arrow arrays.
//!
//! Column lookup with table-aware schema errors, typed downcasts, and the
//! builders used to materialize pipeline output columns.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray, new_null_array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::schema::column_index;

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `table` - Logical table the column belongs to (for error messages)
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    table: &str,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        Error::InvalidColumnType {
            table: table.to_string(),
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        }
        .into()
    })
}

/// Get a column from a record batch by name
///
/// # Arguments
/// * `batch` - The record batch
/// * `table` - Logical table name, reported if the column is missing
/// * `column_name` - The name of the column to find
pub fn get_column_by_name(batch: &RecordBatch, table: &str, column_name: &str) -> Result<ArrayRef> {
    let idx = column_index(batch, table, column_name)?;
    Ok(batch.column(idx).clone())
}

/// Build a `Float64` column from optional values
#[must_use]
pub fn float_column(values: &[Option<f64>]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

/// Build an `Int64` column from optional values
#[must_use]
pub fn int_column(values: &[Option<i64>]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

/// Build a `Utf8` column from optional values
#[must_use]
pub fn string_column<S: AsRef<str>>(values: &[Option<S>]) -> ArrayRef {
    Arc::new(values.iter().map(Option::as_ref).collect::<StringArray>())
}

/// Assemble a record batch from named columns
///
/// Every field is declared nullable so batches built by different stages
/// always share compatible schemas.
pub fn batch_from_columns(columns: Vec<(String, ArrayRef)>) -> Result<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(name.as_str(), array.data_type().clone(), true))
        .collect();
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// An all-null column of the given type and length
#[must_use]
pub fn null_column(data_type: &DataType, length: usize) -> ArrayRef {
    new_null_array(data_type, length)
}
