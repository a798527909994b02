//! Cancer datasets and the merged output table

use arrow::record_batch::RecordBatch;

/// A flat cancer table with the indicator period it is matched against
#[derive(Debug, Clone)]
pub struct CancerDataset {
    /// Logical name (e.g. "incidence"), used in logs and schema errors
    pub name: String,
    /// The raw table
    pub batch: RecordBatch,
    /// Indicator period every row of this dataset is joined against
    pub alignment_period: i64,
}

impl CancerDataset {
    /// Create a dataset
    pub fn new(name: impl Into<String>, batch: RecordBatch, alignment_period: i64) -> Self {
        Self {
            name: name.into(),
            batch,
            alignment_period,
        }
    }

    /// Number of rows in the raw table
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }
}

/// Outcome of joining one dataset against the indicator table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary {
    /// Dataset name
    pub dataset: String,
    /// Alignment period used for the join
    pub alignment_period: i64,
    /// Rows in the dataset (and in its output segment)
    pub rows: usize,
    /// Rows that found an indicator row
    pub matched: usize,
}

impl JoinSummary {
    /// Rows left with null indicator columns
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.rows - self.matched
    }
}

/// The concatenated output of all joins
#[derive(Debug, Clone)]
pub struct MergedTable {
    /// Output rows, one segment per dataset in processing order
    pub batch: RecordBatch,
    /// Per-dataset join statistics, in processing order
    pub segments: Vec<JoinSummary>,
}

impl MergedTable {
    /// Total number of output rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Row range occupied by the named dataset's segment
    #[must_use]
    pub fn segment_range(&self, dataset: &str) -> Option<std::ops::Range<usize>> {
        let mut start = 0;
        for segment in &self.segments {
            if segment.dataset == dataset {
                return Some(start..start + segment.rows);
            }
            start += segment.rows;
        }
        None
    }
}
