//! Health-region name normalization
//!
//! Every table that takes part in a join gets a canonical entity key column
//! computed by [`canonical_key`]. Joins compare only these keys, never the
//! raw entity strings.

pub mod rename;

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::Result;
use crate::schema::{ColumnNames, column_index};
use crate::utils::arrow::{batch_from_columns, coerce_to_string, string_column};

pub use rename::{DEFAULT_RENAME_VERSION, RenameTable, fold_name};

/// Canonical join key for an entity name
///
/// Applies the rename table, then lowercases and trims. Pure: the same name
/// and table always give the same key.
#[must_use]
pub fn canonical_key(name: &str, renames: &RenameTable) -> String {
    renames.canonical_key(name)
}

/// Attach the canonical key column to a table
///
/// The entity column is rewritten to its renamed value (case preserved) and
/// the key column is appended as the last column, replacing any existing key
/// column. Missing entities stay missing in both columns.
///
/// # Arguments
/// * `batch` - Table with an entity column
/// * `table` - Logical table name for schema errors
/// * `columns` - Column names
/// * `renames` - Rename table to apply
///
/// # Errors
/// Returns a schema error if the entity column is absent
pub fn normalize_batch(
    batch: &RecordBatch,
    table: &str,
    columns: &ColumnNames,
    renames: &RenameTable,
) -> Result<RecordBatch> {
    let entity_idx = column_index(batch, table, &columns.entity)?;
    let entities = coerce_to_string(batch.column(entity_idx), table, &columns.entity)?;

    let mut renamed_count = 0;
    let renamed: Vec<Option<String>> = entities
        .iter()
        .map(|entity| {
            entity.as_deref().map(|e| {
                let target = renames.resolve(e);
                if target != e {
                    renamed_count += 1;
                }
                target.to_string()
            })
        })
        .collect();
    let keys: Vec<Option<String>> = renamed.iter().map(|e| e.as_deref().map(fold_name)).collect();

    if renamed_count > 0 {
        debug!(
            "Renamed {renamed_count} entities in '{table}' using rename table '{}'",
            renames.version()
        );
    }

    let renamed_column = string_column(&renamed);
    let schema = batch.schema();
    let mut out: Vec<(String, ArrayRef)> = Vec::with_capacity(batch.num_columns() + 1);
    for (idx, field) in schema.fields().iter().enumerate() {
        if *field.name() == columns.entity_clean {
            continue;
        }
        let column = if idx == entity_idx {
            Arc::clone(&renamed_column)
        } else {
            Arc::clone(batch.column(idx))
        };
        out.push((field.name().clone(), column));
    }
    out.push((columns.entity_clean.clone(), string_column(&keys)));

    batch_from_columns(out)
}
