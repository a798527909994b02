//! Reshaping of the long-form indicator table
//!
//! Pivot to wide form, then fill missing values with column medians.

pub mod impute;
pub mod pivot;

use arrow::record_batch::RecordBatch;
use log::info;

use crate::error::Result;
use crate::models::{IndicatorTable, WideIndicatorTable};
use crate::schema::ColumnNames;

pub use impute::{ColumnImputation, ImputationReport, column_median, impute_medians};
pub use pivot::{DuplicatePolicy, PivotOutput, PivotStats, pivot_indicators};

/// The cleaned indicator table together with what cleaning did
#[derive(Debug, Clone)]
pub struct CleanedIndicators {
    /// Wide, imputed table
    pub table: WideIndicatorTable,
    /// Pivot counters
    pub pivot: PivotStats,
    /// Per-column imputation results
    pub imputation: ImputationReport,
}

/// Reshape and impute a raw long-form indicator batch
///
/// # Arguments
/// * `batch` - Raw long-form table
/// * `table_name` - Logical table name for schema errors
/// * `columns` - Column names
/// * `policy` - Duplicate aggregation rule
pub fn clean_indicators(
    batch: &RecordBatch,
    table_name: &str,
    columns: &ColumnNames,
    policy: DuplicatePolicy,
) -> Result<CleanedIndicators> {
    let records = IndicatorTable::from_batch(batch, table_name, columns)?;
    let PivotOutput { mut table, stats } = pivot_indicators(&records, policy)?;
    let imputation = impute_medians(&mut table);

    info!(
        "Cleaned indicators: {} rows x {} indicators, {} values imputed",
        table.num_rows(),
        table.attributes().len(),
        imputation.total_filled()
    );

    Ok(CleanedIndicators {
        table,
        pivot: stats,
        imputation,
    })
}
