//! Lenient value coercion for Arrow arrays
//!
//! Raw tables arrive with whatever types CSV inference or the Parquet writer
//! chose. These helpers read an entire column as `f64`, `i64` or `String`
//! values. A value that cannot be coerced becomes `None`; only an array type
//! that cannot be read at all is an error.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, LargeStringArray, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;

use crate::error::{Error, Result};
use crate::utils::arrow::array_utils::downcast_array;

/// Whether a data type is numeric (integer, unsigned or floating point)
#[must_use]
pub fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Parse a single text token as a finite `f64`
///
/// Surrounding whitespace is ignored. Empty strings, malformed tokens and
/// non-finite values (`NaN`, `inf`) yield `None`.
#[must_use]
pub fn parse_f64(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a single text token as an integral period
///
/// Accepts plain integers as well as integral floats such as `"2016.0"`.
#[must_use]
pub fn parse_i64(token: &str) -> Option<i64> {
    let token = token.trim();
    token
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(token).and_then(integral_f64))
}

fn integral_f64(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
}

/// Read an array as text values, casting non-text arrays
///
/// # Errors
/// Returns [`Error::InvalidColumnType`] naming the table if the array type
/// has no text representation
fn text_values(array: &ArrayRef, table: &str, column_name: &str) -> Result<Vec<Option<String>>> {
    match array.data_type() {
        DataType::Utf8 => {
            let strings = downcast_array::<StringArray>(array, table, column_name, "Utf8")?;
            Ok(strings.iter().map(|v| v.map(str::to_string)).collect())
        }
        DataType::LargeUtf8 => {
            let strings = downcast_array::<LargeStringArray>(array, table, column_name, "LargeUtf8")?;
            Ok(strings.iter().map(|v| v.map(str::to_string)).collect())
        }
        DataType::Null => Ok(vec![None; array.len()]),
        other => {
            let casted = cast::cast(array, &DataType::Utf8).map_err(|_| Error::InvalidColumnType {
                table: table.to_string(),
                column: column_name.to_string(),
                expected: format!("text (found {other:?})"),
            })?;
            text_values(&casted, table, column_name)
        }
    }
}

/// Coerce an array to `f64` values
///
/// Numeric and boolean arrays are cast; text arrays are parsed token by token
/// with [`parse_f64`]. Unparseable or non-finite values become `None`.
///
/// # Arguments
/// * `array` - The array to coerce
/// * `table` - Logical table name used in error messages
/// * `column_name` - Column name used in error messages
pub fn coerce_to_f64(array: &ArrayRef, table: &str, column_name: &str) -> Result<Vec<Option<f64>>> {
    let data_type = array.data_type();
    if is_numeric(data_type) || *data_type == DataType::Boolean {
        let casted = cast::cast(array, &DataType::Float64)?;
        let floats = downcast_array::<Float64Array>(&casted, table, column_name, "Float64")?;
        return Ok(floats
            .iter()
            .map(|v| v.filter(|f| f.is_finite()))
            .collect());
    }

    Ok(text_values(array, table, column_name)?
        .into_iter()
        .map(|v| v.as_deref().and_then(parse_f64))
        .collect())
}

/// Coerce an array to integral `i64` values
///
/// Floating point values with a fractional part become `None`.
pub fn coerce_to_i64(array: &ArrayRef, table: &str, column_name: &str) -> Result<Vec<Option<i64>>> {
    match array.data_type() {
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            Ok(coerce_to_f64(array, table, column_name)?
                .into_iter()
                .map(|v| v.and_then(integral_f64))
                .collect())
        }
        t if is_numeric(t) => {
            let casted = cast::cast(array, &DataType::Int64)?;
            let ints = downcast_array::<Int64Array>(&casted, table, column_name, "Int64")?;
            Ok(ints.iter().collect())
        }
        _ => Ok(text_values(array, table, column_name)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_i64))
            .collect()),
    }
}

/// Coerce an array to owned string values
pub fn coerce_to_string(array: &ArrayRef, table: &str, column_name: &str) -> Result<Vec<Option<String>>> {
    text_values(array, table, column_name)
}
