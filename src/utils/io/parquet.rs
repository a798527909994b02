//! Parquet file operations
//!
//! Reading a Parquet file into a single Arrow record batch and writing a
//! record batch back out.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Error, Result};
use crate::error::util::{safe_create_file, safe_open_file};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Read a parquet file into one Arrow record batch
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `purpose` - Logical table name, used for error context
pub fn read_parquet(path: &Path, purpose: &str) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = safe_open_file(path, purpose)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(Error::Parquet)
        .with_context(|| format!("Failed to read parquet file: {}", path.display()))?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .map_err(Error::Parquet)
        .with_context(|| format!("Failed to build parquet reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .with_context(|| format!("Failed to read record batch from {}", path.display()))?;
        batches.push(batch);
    }

    let batch = concat_batches(&schema, &batches)?;
    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Write a record batch to a parquet file
///
/// # Arguments
/// * `batch` - The table to write
/// * `path` - Destination path; parent directories are created
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing parquet file", path);

    let file = safe_create_file(path, "parquet output")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(Error::Parquet)
        .with_context(|| format!("Failed to create parquet writer for {}", path.display()))?;
    writer.write(batch).map_err(Error::Parquet)?;
    writer
        .close()
        .map_err(Error::Parquet)
        .with_context(|| format!("Failed to finalize parquet file {}", path.display()))?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
