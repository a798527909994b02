//! Column naming and input-contract checks.
//!
//! The join logic depends on literal column names matching across the
//! indicator and cancer tables. [`ColumnNames`] holds those literals and
//! [`require_columns`] turns an absent column into a fatal schema error that
//! names both the table and the column.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default name of the entity (health region) column
pub const GEOGRAPHY: &str = "Geography";
/// Default name of the period column
pub const YEAR: &str = "Year";
/// Default name of the long-form attribute column
pub const INDICATOR: &str = "Indicator";
/// Default name of the long-form value column
pub const VALUE: &str = "Value";
/// Default name of the canonical entity key column
pub const GEOGRAPHY_CLEAN: &str = "Geography_clean";
/// Default name of the synthetic alignment period column
pub const SDOH_YEAR: &str = "SDOH_Year";

/// Suffix given to an indicator column whose name is already taken
pub const INDICATOR_SUFFIX: &str = "_sdoh";

/// Literal column names shared by all input and output tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Entity column present in every table
    pub entity: String,
    /// Period column present in every table
    pub period: String,
    /// Attribute column of the long-form indicator table
    pub attribute: String,
    /// Value column of the long-form indicator table
    pub value: String,
    /// Canonical entity key column added by normalization
    pub entity_clean: String,
    /// Alignment period column attached to each cancer table
    pub alignment_period: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            entity: GEOGRAPHY.to_string(),
            period: YEAR.to_string(),
            attribute: INDICATOR.to_string(),
            value: VALUE.to_string(),
            entity_clean: GEOGRAPHY_CLEAN.to_string(),
            alignment_period: SDOH_YEAR.to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns a long-form indicator table must carry
    #[must_use]
    pub fn long_form_keys(&self) -> [&str; 4] {
        [
            self.entity.as_str(),
            self.period.as_str(),
            self.attribute.as_str(),
            self.value.as_str(),
        ]
    }

    /// Columns every flat (wide or cancer) table must carry
    #[must_use]
    pub fn flat_keys(&self) -> [&str; 2] {
        [self.entity.as_str(), self.period.as_str()]
    }

    /// Whether a column name is one of the key columns of a flat table
    #[must_use]
    pub fn is_key_column(&self, name: &str) -> bool {
        name == self.entity || name == self.period || name == self.entity_clean
    }

    /// Check that the configured names are usable
    pub fn validate(&self) -> Result<()> {
        let names = [
            &self.entity,
            &self.period,
            &self.attribute,
            &self.value,
            &self.entity_clean,
            &self.alignment_period,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(Error::InvalidConfig("column names must not be empty".into()).into());
        }
        if self.entity_clean == self.entity || self.alignment_period == self.period {
            return Err(Error::InvalidConfig(
                "derived key columns must not shadow the entity or period columns".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Get the index of a column, or a schema error naming table and column
pub fn column_index(batch: &RecordBatch, table: &str, column: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column)
        .map_err(|_| Error::missing_column(table, column).into())
}

/// Ensure every listed column exists in the batch
///
/// # Errors
/// Returns [`Error::MissingColumn`] for the first absent column
pub fn require_columns(batch: &RecordBatch, table: &str, columns: &[&str]) -> Result<()> {
    for column in columns {
        column_index(batch, table, column)?;
    }
    Ok(())
}
