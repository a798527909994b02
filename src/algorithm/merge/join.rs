//! Left join of a cancer dataset against the wide indicator table
//!
//! Every cancer row is matched on (canonical entity, alignment period)
//! against (canonical entity, period) of the indicator table. Rows without a
//! counterpart keep null indicator columns; no cancer row is ever dropped or
//! repeated.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use log::debug;
use rustc_hash::FxHashMap;

use crate::algorithm::normalize::{RenameTable, normalize_batch};
use crate::error::Result;
use crate::models::{CancerDataset, JoinSummary, WideIndicatorTable};
use crate::schema::{ColumnNames, INDICATOR_SUFFIX, require_columns};
use crate::utils::arrow::{batch_from_columns, coerce_to_string, float_column, int_column};
use crate::utils::logging::log_warning;

/// Lookup from (canonical entity, period) to indicator row
#[derive(Debug)]
pub struct IndicatorIndex {
    rows: FxHashMap<(String, i64), usize>,
    collisions: usize,
}

impl IndicatorIndex {
    /// Index the rows of a wide table by canonical key and period
    ///
    /// When several rows share a key (two historical names renamed to the
    /// same region), the first row in table order wins.
    #[must_use]
    pub fn build(table: &WideIndicatorTable, renames: &RenameTable) -> Self {
        let mut rows = FxHashMap::default();
        let mut collisions = 0;
        for (row, (entity, period)) in table.entities().iter().zip(table.periods()).enumerate() {
            let key = (renames.canonical_key(entity), *period);
            if rows.contains_key(&key) {
                collisions += 1;
            } else {
                rows.insert(key, row);
            }
        }

        if collisions > 0 {
            log_warning(
                &format!("{collisions} indicator rows share a canonical key and period with an earlier row; the earlier row is used"),
                Some("indicators"),
            );
        }
        Self { rows, collisions }
    }

    /// Indicator row for a canonical key and period
    #[must_use]
    pub fn lookup(&self, key: &str, period: i64) -> Option<usize> {
        // Keys are owned strings; this allocation is per cancer row only
        self.rows.get(&(key.to_string(), period)).copied()
    }

    /// Number of indicator rows shadowed by an earlier row with the same key
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Left-join one cancer dataset against the indicator table
///
/// Output columns are the cancer columns in input order (entity renamed),
/// the alignment period column, the canonical key column, then one column
/// per indicator attribute.
///
/// # Errors
/// Returns a schema error if the dataset lacks the entity or period column
pub fn join_dataset(
    dataset: &CancerDataset,
    indicators: &WideIndicatorTable,
    index: &IndicatorIndex,
    columns: &ColumnNames,
    renames: &RenameTable,
) -> Result<(RecordBatch, JoinSummary)> {
    require_columns(&dataset.batch, &dataset.name, &columns.flat_keys())?;
    let normalized = normalize_batch(&dataset.batch, &dataset.name, columns, renames)?;
    let rows = normalized.num_rows();

    let key_idx = normalized.num_columns() - 1;
    let keys = coerce_to_string(normalized.column(key_idx), &dataset.name, &columns.entity_clean)?;
    let matches: Vec<Option<usize>> = keys
        .iter()
        .map(|key| {
            key.as_deref()
                .and_then(|k| index.lookup(k, dataset.alignment_period))
        })
        .collect();
    let matched = matches.iter().filter(|m| m.is_some()).count();

    let schema = normalized.schema();
    let mut out: Vec<(String, ArrayRef)> = Vec::with_capacity(key_idx + indicators.attributes().len() + 2);
    for (idx, field) in schema.fields().iter().enumerate().take(key_idx) {
        if *field.name() == columns.alignment_period {
            debug!(
                "Replacing existing '{}' column of '{}'",
                columns.alignment_period, dataset.name
            );
            continue;
        }
        out.push((field.name().clone(), Arc::clone(normalized.column(idx))));
    }
    out.push((
        columns.alignment_period.clone(),
        int_column(&vec![Some(dataset.alignment_period); rows]),
    ));
    out.push((columns.entity_clean.clone(), Arc::clone(normalized.column(key_idx))));

    for (attribute, values) in indicators.columns() {
        let joined: Vec<Option<f64>> = matches
            .iter()
            .map(|m| m.and_then(|row| values[row]))
            .collect();
        let name = if out.iter().any(|(existing, _)| existing == attribute) {
            format!("{attribute}{INDICATOR_SUFFIX}")
        } else {
            attribute.to_string()
        };
        out.push((name, float_column(&joined)));
    }

    let summary = JoinSummary {
        dataset: dataset.name.clone(),
        alignment_period: dataset.alignment_period,
        rows,
        matched,
    };
    if rows > 0 && matched == 0 {
        log_warning(
            &format!(
                "no rows matched an indicator row for period {}",
                dataset.alignment_period
            ),
            Some(&dataset.name),
        );
    } else {
        debug!(
            "Joined '{}': {matched}/{rows} rows matched period {}",
            dataset.name, dataset.alignment_period
        );
    }

    Ok((batch_from_columns(out)?, summary))
}
