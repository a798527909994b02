//! Merging cancer datasets with the wide indicator table
//!
//! Each dataset is left-joined on (canonical entity, alignment period) and
//! the joined segments are stacked in processing order.

pub mod concat;
pub mod join;

use log::info;

use crate::algorithm::normalize::RenameTable;
use crate::error::{Error, Result};
use crate::models::{CancerDataset, MergedTable, WideIndicatorTable};
use crate::schema::ColumnNames;

pub use concat::{concat_tables, union_schema, unify_types};
pub use join::{IndicatorIndex, join_dataset};

/// Join every dataset against the indicator table and concatenate the results
///
/// # Arguments
/// * `indicators` - Cleaned wide indicator table
/// * `datasets` - Cancer datasets in processing order
/// * `columns` - Column names
/// * `renames` - Rename table applied to both sides
///
/// # Errors
/// Returns a schema error naming the first dataset that lacks a key column,
/// or a configuration error when no datasets are given
pub fn merge_datasets(
    indicators: &WideIndicatorTable,
    datasets: &[CancerDataset],
    columns: &ColumnNames,
    renames: &RenameTable,
) -> Result<MergedTable> {
    if datasets.is_empty() {
        return Err(Error::InvalidConfig("at least one dataset is required for a merge".into()).into());
    }

    let index = IndicatorIndex::build(indicators, renames);
    let mut segments = Vec::with_capacity(datasets.len());
    let mut summaries = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let (segment, summary) = join_dataset(dataset, indicators, &index, columns, renames)?;
        info!(
            "Joined '{}' against period {}: {} of {} rows matched",
            summary.dataset, summary.alignment_period, summary.matched, summary.rows
        );
        segments.push(segment);
        summaries.push(summary);
    }

    let batch = concat_tables(&segments)?;
    Ok(MergedTable {
        batch,
        segments: summaries,
    })
}
