//! Table transformations of the pipeline
//!
//! Reshaping of the long-form indicator table, health-region name
//! normalization, and the join and concatenation of cancer datasets.

pub mod merge;
pub mod normalize;
pub mod reshape;
