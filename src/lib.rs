//! Merging of social determinants of health indicators with regional cancer
//! statistics.
//!
//! A long-form indicator table is pivoted to one row per (health region,
//! year) and its gaps are filled with column medians. Health-region names
//! are normalized through a versioned rename table, and each cancer dataset
//! is left-joined against the indicators at a fixed alignment year before
//! the joined datasets are stacked into one output table.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{DEFAULT_ALIGNMENT_PERIOD, DatasetSpec, PipelineConfig};
pub use error::{Error, Result};
pub use models::{CancerDataset, JoinSummary, MergedTable, WideIndicatorTable};
pub use pipeline::{Pipeline, PipelineReport};
pub use schema::ColumnNames;

// Stages
pub use algorithm::merge::merge_datasets;
pub use algorithm::normalize::{RenameTable, canonical_key, normalize_batch};
pub use algorithm::reshape::{CleanedIndicators, DuplicatePolicy, clean_indicators};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// File helpers
pub use utils::{TableFormat, read_table, write_table};
