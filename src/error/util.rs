//! Utility functions for error handling
//!
//! File helpers that attach the path and purpose of an operation to any
//! failure, so pipeline errors read like "failed to open ... for: incidence".

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )))
        .with_context(|| format!("Needed for: {purpose}"));
    }

    if !path.is_file() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path is not a file: {}", path.display()),
        )))
        .with_context(|| format!("Expected a file for: {purpose}"));
    }

    fs::File::open(path)
        .map_err(Error::Io)
        .with_context(|| match fs::metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                format!("Permission denied opening {}", path.display())
            }
            _ => format!("Failed to open {} for: {purpose}", path.display()),
        })
}

/// Create (or truncate) a file for writing, creating parent directories
///
/// # Arguments
/// * `path` - The path of the file to create
/// * `purpose` - Why the file is being written (for error context)
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(Error::Io)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::File::create(path)
        .map_err(Error::Io)
        .with_context(|| format!("Failed to create {} for: {purpose}", path.display()))
}
