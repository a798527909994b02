//! Domain models for the SDOH merge pipeline
//!
//! Typed views over the Arrow tables that flow between pipeline stages:
//! the long-form indicator records, the wide indicator table produced by
//! reshaping, the cancer datasets with their alignment period, and the
//! merged output.

pub mod cancer;
pub mod indicator;
pub mod wide;

pub use cancer::{CancerDataset, JoinSummary, MergedTable};
pub use indicator::{IndicatorRecord, IndicatorTable};
pub use wide::WideIndicatorTable;
