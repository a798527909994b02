//! Table input/output
//!
//! Tables are read from and written to CSV or Parquet files; the format is
//! chosen from the file extension.

pub mod csv;
pub mod parquet;

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

pub use self::csv::{read_csv, write_csv};
pub use self::parquet::{read_parquet, write_parquet};

/// On-disk format of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl TableFormat {
    /// Determine the format from a file extension
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFormat`] for unknown or missing extensions
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "parq" | "pq") => Ok(Self::Parquet),
            _ => Err(Error::UnsupportedFormat(path.display().to_string()).into()),
        }
    }
}

/// Read a table file, dispatching on its extension
///
/// # Arguments
/// * `path` - File to read
/// * `purpose` - Logical table name for error context
pub fn read_table(path: &Path, purpose: &str) -> Result<RecordBatch> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv(path, purpose),
        TableFormat::Parquet => read_parquet(path, purpose),
    }
}

/// Write a table file, dispatching on its extension
pub fn write_table(batch: &RecordBatch, path: &Path) -> Result<()> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => write_csv(batch, path),
        TableFormat::Parquet => write_parquet(batch, path),
    }
}
