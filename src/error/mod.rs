//! Error handling for the SDOH merge pipeline.
//!
//! Typed failures are described by [`Error`]. Operations return the crate-wide
//! [`Result`], an `anyhow::Result`, so file operations can attach path context
//! while callers can still recover the typed variant with `downcast_ref`.

pub mod util;

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors raised by the pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required column is absent from an input table
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// Logical name of the table (e.g. "indicators", "incidence")
        table: String,
        /// Name of the missing column
        column: String,
    },

    /// A column exists but cannot be read as the expected type
    #[error("Column '{column}' in table '{table}' cannot be read as {expected}")]
    InvalidColumnType {
        /// Logical name of the table
        table: String,
        /// Name of the column
        column: String,
        /// Human readable description of the expected type
        expected: String,
    },

    /// Duplicate (entity, period, attribute) triple under the reject policy
    #[error("Duplicate indicator value for ({entity}, {period}, {attribute})")]
    DuplicateEntry {
        /// Entity of the duplicated triple
        entity: String,
        /// Period of the duplicated triple
        period: i64,
        /// Attribute of the duplicated triple
        attribute: String,
    },

    /// A file extension that is neither CSV nor Parquet
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::MissingColumn`]
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = anyhow::Result<T>;
