//! The wide indicator table

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use log::warn;

use crate::algorithm::normalize::RenameTable;
use crate::error::{Error, Result};
use crate::schema::{ColumnNames, INDICATOR_SUFFIX, require_columns};
use crate::utils::arrow::{
    batch_from_columns, coerce_to_f64, coerce_to_i64, coerce_to_string, float_column,
    get_column_by_name, int_column, string_column,
};

/// One row per (entity, period), one numeric column per indicator
///
/// Values are stored column-major: `values[a][r]` is attribute `a` of row `r`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideIndicatorTable {
    entities: Vec<String>,
    periods: Vec<i64>,
    attributes: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl WideIndicatorTable {
    /// Create a wide table, checking that all columns have the same length
    pub fn new(
        entities: Vec<String>,
        periods: Vec<i64>,
        attributes: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        let rows = entities.len();
        if periods.len() != rows {
            return Err(Error::InvalidConfig(format!(
                "wide table has {rows} entities but {} periods",
                periods.len()
            ))
            .into());
        }
        if attributes.len() != values.len() {
            return Err(Error::InvalidConfig(format!(
                "wide table has {} attributes but {} value columns",
                attributes.len(),
                values.len()
            ))
            .into());
        }
        if let Some((name, column)) = attributes
            .iter()
            .zip(&values)
            .find(|(_, column)| column.len() != rows)
        {
            return Err(Error::InvalidConfig(format!(
                "attribute '{name}' has {} values for {rows} rows",
                column.len()
            ))
            .into());
        }

        Ok(Self {
            entities,
            periods,
            attributes,
            values,
        })
    }

    /// Read a wide table from a record batch
    ///
    /// The entity and period columns are required; the canonical key column
    /// is ignored (it is recomputed at merge time) and every other column is
    /// coerced to numeric as an attribute. Rows without an entity or period
    /// cannot be joined and are dropped.
    pub fn from_batch(batch: &RecordBatch, table: &str, columns: &ColumnNames) -> Result<Self> {
        require_columns(batch, table, &columns.flat_keys())?;

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
        let keep: Vec<bool> = entities
            .iter()
            .zip(&periods)
            .map(|(e, p)| e.is_some() && p.is_some())
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped > 0 {
            warn!("Dropped {dropped} rows of '{table}' without an entity or period");
        }

        let mut attributes = Vec::new();
        let mut values = Vec::new();
        for (idx, field) in batch.schema().fields().iter().enumerate() {
            let name = field.name();
            if columns.is_key_column(name) {
                continue;
            }
            let coerced = coerce_to_f64(batch.column(idx), table, name)?;
            attributes.push(name.clone());
            values.push(retain(coerced, &keep));
        }

        Self::new(
            retain(entities, &keep).into_iter().flatten().collect(),
            retain(periods, &keep).into_iter().flatten().collect(),
            attributes,
            values,
        )
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.entities.len()
    }

    /// Entity name of every row
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Period of every row
    #[must_use]
    pub fn periods(&self) -> &[i64] {
        &self.periods
    }

    /// Attribute names in column order
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// All values of one attribute
    #[must_use]
    pub fn column(&self, attribute: &str) -> Option<&[Option<f64>]> {
        self.attributes
            .iter()
            .position(|a| a == attribute)
            .map(|idx| self.values[idx].as_slice())
    }

    /// A single cell
    #[must_use]
    pub fn value(&self, row: usize, attribute: &str) -> Option<f64> {
        self.column(attribute).and_then(|c| c.get(row).copied().flatten())
    }

    /// Iterate attribute columns as (name, values)
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.attributes
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Mutable access to attribute columns, used by imputation
    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<Option<f64>>)> {
        self.attributes.iter().map(String::as_str).zip(self.values.iter_mut())
    }

    /// Materialize as a record batch
    ///
    /// Columns are entity, period, then (when a rename table is supplied)
    /// the canonical key, then one `Float64` column per attribute. An
    /// attribute named like a key column is written with a suffix so it
    /// survives a read back through [`WideIndicatorTable::from_batch`].
    pub fn to_batch(&self, columns: &ColumnNames, renames: Option<&RenameTable>) -> Result<RecordBatch> {
        let mut out: Vec<(String, ArrayRef)> = Vec::with_capacity(self.attributes.len() + 3);
        out.push((
            columns.entity.clone(),
            string_column(&self.entities.iter().map(Some).collect::<Vec<_>>()),
        ));
        out.push((
            columns.period.clone(),
            int_column(&self.periods.iter().copied().map(Some).collect::<Vec<_>>()),
        ));
        if let Some(renames) = renames {
            let keys: Vec<Option<String>> = self
                .entities
                .iter()
                .map(|e| Some(renames.canonical_key(e)))
                .collect();
            out.push((columns.entity_clean.clone(), string_column(&keys)));
        }
        for (name, values) in self.columns() {
            let mut column_name = name.to_string();
            while columns.is_key_column(&column_name)
                || out.iter().any(|(existing, _)| *existing == column_name)
                || (column_name != name && self.attributes.iter().any(|a| *a == column_name))
            {
                column_name.push_str(INDICATOR_SUFFIX);
            }
            if column_name != name {
                warn!("Indicator '{name}' clashes with a key column; writing it as '{column_name}'");
            }
            out.push((column_name, float_column(values)));
        }
        batch_from_columns(out)
    }
}

fn retain<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, k)| k.then_some(v))
        .collect()
}
