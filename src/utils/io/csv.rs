//! CSV file operations
//!
//! CSV tables are read with a header row and an inferred schema: integer
//! columns become `Int64`, numeric columns `Float64`, anything mixed `Utf8`,
//! and empty fields are nulls.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::error::util::{safe_create_file, safe_open_file};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Read a CSV file into one Arrow record batch
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `purpose` - Logical table name, used for error context
pub fn read_csv(path: &Path, purpose: &str) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut file = safe_open_file(path, purpose)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .with_context(|| format!("Failed to infer schema of {}", path.display()))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)
        .with_context(|| format!("Failed to build CSV reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .with_context(|| format!("Failed to parse CSV records from {}", path.display()))?;
        batches.push(batch);
    }

    let batch = concat_batches(&schema, &batches)?;
    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Write a record batch as CSV with a header row
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing CSV file", path);

    let file = safe_create_file(path, "CSV output")?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer
        .write(batch)
        .with_context(|| format!("Failed to write CSV records to {}", path.display()))?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
