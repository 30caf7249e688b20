//! Utility functions for error handling
//!
//! File-system checks that turn a bare `io::Error` into something that says
//! which file was wanted and why.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::{AnalyzerError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(AnalyzerError::MissingSource {
            path: path.to_path_buf(),
        })
        .with_context(|| format!("Needed for: {purpose}"));
    }

    if !path.is_file() {
        return Err(anyhow::anyhow!(
            "Path is not a file: {} (expected a file for: {purpose})",
            path.display()
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions".to_string(),
            _ => format!("Failed to open file for: {purpose}"),
        };
        anyhow::Error::new(AnalyzerError::Io(e))
            .context(format!("{context}: {}", path.display()))
    })
}

/// Make sure a directory exists, creating it when missing
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path is not a directory: {} (expected a directory for: {purpose})",
            path.display()
        ));
    }

    fs::create_dir_all(path)
        .map_err(AnalyzerError::Io)
        .with_context(|| format!("Failed to create directory {} for: {purpose}", path.display()))
}
