//! Arrow data handling utilities
//!
//! Column lookup, typed downcasts, and the lenient coercion helpers used by
//! the reshaping and merging stages.

pub mod array_utils;
pub mod conversion;

// Re-export commonly used functions for convenience
pub use array_utils::{
    batch_from_columns, downcast_array, float_column, get_column_by_name, int_column, null_column, string_column,
};
pub use conversion::{
    coerce_to_f64, coerce_to_i64, coerce_to_string, is_numeric, parse_f64, parse_i64,
};
