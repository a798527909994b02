//! Logging utilities
//!
//! This module provides standardized logging functions for table operations.

use std::path::Path;
use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `rows` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows ({}) in {:?}",
            operation,
            rows,
            path.display(),
            duration
        );
    } else {
        log::info!("Successfully {} {} rows ({})", operation, rows, path.display());
    }
}

/// Log a warning, optionally tied to a table name
///
/// # Arguments
/// * `message` - Warning message
/// * `table` - Optional logical table the warning concerns
pub fn log_warning(message: &str, table: Option<&str>) {
    if let Some(table) = table {
        log::warn!("[{table}] {message}");
    } else {
        log::warn!("{message}");
    }
}
