//! Long-to-wide pivot of indicator records
//!
//! Records are grouped by (entity, period) and spread into one column per
//! distinct attribute. Rows come out in ascending (entity, period) order and
//! attribute columns in ascending name order, so identical input always
//! yields an identical table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{IndicatorTable, WideIndicatorTable};

/// How several values for the same (entity, period, attribute) are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Arithmetic mean of the numeric values
    #[default]
    Mean,
    /// First numeric value in input order
    First,
    /// Last numeric value in input order
    Last,
    /// Fail with [`Error::DuplicateEntry`]
    Reject,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "mean",
            Self::First => "first",
            Self::Last => "last",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected mean, first, last or reject)"
            )),
        }
    }
}

/// Counters describing a pivot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotStats {
    /// Records that entered the pivot
    pub input_records: usize,
    /// Source rows dropped for a missing entity, period or attribute
    pub skipped_rows: usize,
    /// Source values that failed numeric coercion
    pub coerced_missing: usize,
    /// Cells that received more than one record
    pub duplicate_cells: usize,
}

/// Result of [`pivot_indicators`]
#[derive(Debug, Clone)]
pub struct PivotOutput {
    /// The wide table, before imputation
    pub table: WideIndicatorTable,
    /// Pivot counters
    pub stats: PivotStats,
}

#[derive(Debug, Default)]
struct Cell {
    records: usize,
    sum: f64,
    observed: usize,
    first: Option<f64>,
    last: Option<f64>,
}

impl Cell {
    fn push(&mut self, value: Option<f64>) {
        self.records += 1;
        if let Some(v) = value {
            self.sum += v;
            self.observed += 1;
            self.first.get_or_insert(v);
            self.last = Some(v);
        }
    }

    fn resolve(&self, policy: DuplicatePolicy) -> Option<f64> {
        match policy {
            DuplicatePolicy::Mean | DuplicatePolicy::Reject => {
                (self.observed > 0).then(|| self.sum / self.observed as f64)
            }
            DuplicatePolicy::First => self.first,
            DuplicatePolicy::Last => self.last,
        }
    }
}

/// Pivot long-form indicator records into a wide table
///
/// # Arguments
/// * `table` - Coerced long-form records
/// * `policy` - Aggregation rule for duplicate (entity, period, attribute) triples
///
/// # Errors
/// Returns [`Error::DuplicateEntry`] for the first duplicate when `policy`
/// is [`DuplicatePolicy::Reject`]
pub fn pivot_indicators(table: &IndicatorTable, policy: DuplicatePolicy) -> Result<PivotOutput> {
    let mut cells: BTreeMap<(&str, i64), BTreeMap<&str, Cell>> = BTreeMap::new();
    let mut attributes: BTreeSet<&str> = BTreeSet::new();
    let mut duplicate_cells = 0;

    for record in &table.records {
        attributes.insert(record.attribute.as_str());
        let cell = cells
            .entry((record.entity.as_str(), record.period))
            .or_default()
            .entry(record.attribute.as_str())
            .or_default();

        if cell.records == 1 {
            duplicate_cells += 1;
            if policy == DuplicatePolicy::Reject {
                return Err(Error::DuplicateEntry {
                    entity: record.entity.clone(),
                    period: record.period,
                    attribute: record.attribute.clone(),
                }
                .into());
            }
        }
        cell.push(record.value);
    }

    let attributes: Vec<&str> = attributes.into_iter().collect();
    let mut entities = Vec::with_capacity(cells.len());
    let mut periods = Vec::with_capacity(cells.len());
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(cells.len()); attributes.len()];

    for ((entity, period), row) in &cells {
        entities.push((*entity).to_string());
        periods.push(*period);
        for (column, attribute) in values.iter_mut().zip(&attributes) {
            column.push(row.get(attribute).and_then(|cell| cell.resolve(policy)));
        }
    }

    if duplicate_cells > 0 {
        info!("Aggregated {duplicate_cells} duplicate indicator cells using the '{policy}' policy");
    }
    debug!(
        "Pivoted {} records into {} rows x {} indicators",
        table.len(),
        entities.len(),
        attributes.len()
    );

    let stats = PivotStats {
        input_records: table.len(),
        skipped_rows: table.skipped_rows,
        coerced_missing: table.coerced_missing,
        duplicate_cells,
    };
    let table = WideIndicatorTable::new(
        entities,
        periods,
        attributes.into_iter().map(str::to_string).collect(),
        values,
    )?;

    Ok(PivotOutput { table, stats })
}
