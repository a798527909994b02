//! Median imputation of the wide indicator table
//!
//! Each attribute column is filled independently with the median of its own
//! observed values, computed from the rows actually loaded. A column with no
//! observed values has no median and is left missing.

use log::{debug, warn};

use crate::models::WideIndicatorTable;

/// What imputation did to one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnImputation {
    /// Attribute name
    pub column: String,
    /// Median used for filling; `None` for a degenerate column
    pub median: Option<f64>,
    /// Number of cells that were filled
    pub filled: usize,
}

/// Per-column imputation results, in attribute order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputationReport {
    /// One entry per attribute column
    pub columns: Vec<ColumnImputation>,
}

impl ImputationReport {
    /// Total number of filled cells
    #[must_use]
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }

    /// Columns that were entirely missing and stay missing
    pub fn degenerate_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.median.is_none())
            .map(|c| c.column.as_str())
    }
}

/// Median of the observed values, or `None` if there are none
///
/// For an even number of observations this is the mean of the two middle
/// values.
#[must_use]
pub fn column_median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(f64::total_cmp);

    let mid = observed.len() / 2;
    if observed.len() % 2 == 0 {
        Some((observed[mid - 1] + observed[mid]) / 2.0)
    } else {
        Some(observed[mid])
    }
}

/// Fill missing cells of every attribute column with that column's median
pub fn impute_medians(table: &mut WideIndicatorTable) -> ImputationReport {
    let mut report = ImputationReport::default();

    for (name, values) in table.columns_mut() {
        let median = column_median(values);
        let mut filled = 0;

        match median {
            Some(m) => {
                for cell in values.iter_mut().filter(|v| v.is_none()) {
                    *cell = Some(m);
                    filled += 1;
                }
                if filled > 0 {
                    debug!("Filled {filled} missing values of '{name}' with median {m}");
                }
            }
            None if !values.is_empty() => {
                warn!("Indicator '{name}' has no observed values; leaving it missing");
            }
            None => {}
        }

        report.columns.push(ColumnImputation {
            column: name.to_string(),
            median,
            filled,
        });
    }

    report
}
