//! Long-form indicator records

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::Result;
use crate::schema::{ColumnNames, require_columns};
use crate::utils::arrow::{coerce_to_f64, coerce_to_i64, coerce_to_string, get_column_by_name};

/// One (entity, period, attribute, value) observation
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    /// Health region name as it appears in the source
    pub entity: String,
    /// Observation year
    pub period: i64,
    /// Indicator name
    pub attribute: String,
    /// Numeric value; `None` when missing or not coercible
    pub value: Option<f64>,
}

impl IndicatorRecord {
    /// Create a record
    pub fn new(
        entity: impl Into<String>,
        period: i64,
        attribute: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        Self {
            entity: entity.into(),
            period,
            attribute: attribute.into(),
            value,
        }
    }
}

/// The long-form indicator table after value coercion
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    /// Usable records in source order
    pub records: Vec<IndicatorRecord>,
    /// Rows dropped because entity, period or attribute was missing
    pub skipped_rows: usize,
    /// Non-null source values that failed numeric coercion
    pub coerced_missing: usize,
}

impl IndicatorTable {
    /// Build a table directly from records
    #[must_use]
    pub fn from_records(records: Vec<IndicatorRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Extract records from a long-form record batch
    ///
    /// # Arguments
    /// * `batch` - Table with entity, period, attribute and value columns
    /// * `table` - Logical table name used in schema errors
    /// * `columns` - Column names to read
    ///
    /// # Errors
    /// Returns a schema error if any of the four key columns is absent
    pub fn from_batch(batch: &RecordBatch, table: &str, columns: &ColumnNames) -> Result<Self> {
        require_columns(batch, table, &columns.long_form_keys())?;

        let entities = coerce_to_string(
            &get_column_by_name(batch, table, &columns.entity)?,
            table,
            &columns.entity,
        )?;
        let periods = coerce_to_i64(
            &get_column_by_name(batch, table, &columns.period)?,
            table,
            &columns.period,
        )?;
        let attributes = coerce_to_string(
            &get_column_by_name(batch, table, &columns.attribute)?,
            table,
            &columns.attribute,
        )?;
        let raw_values = get_column_by_name(batch, table, &columns.value)?;
        let values = coerce_to_f64(&raw_values, table, &columns.value)?;

        let mut out = Self::default();
        for (row, value) in values.into_iter().enumerate() {
            if value.is_none() && !raw_values.is_null(row) {
                out.coerced_missing += 1;
            }

            match (&entities[row], periods[row], &attributes[row]) {
                (Some(entity), Some(period), Some(attribute)) => {
                    out.records
                        .push(IndicatorRecord::new(entity.as_str(), period, attribute.as_str(), value));
                }
                _ => out.skipped_rows += 1,
            }
        }

        debug!(
            "Extracted {} indicator records from '{table}' ({} skipped, {} values not numeric)",
            out.records.len(),
            out.skipped_rows,
            out.coerced_missing
        );
        Ok(out)
    }

    /// Number of usable records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no usable records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
