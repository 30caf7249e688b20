//! Error handling for the cohort analyzer.
//!
//! Every failure in a run is fatal, so operations return [`Result`] (an
//! `anyhow::Result`) and attach context at the call site. [`AnalyzerError`]
//! names the failures the crate itself detects.

use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Failures detected while loading or querying relations
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from an Arrow kernel or the CSV reader
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing a persisted relation
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error reading or writing the store manifest
    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),

    /// A source file expected by ingestion does not exist
    #[error("Source file not found: {}", path.display())]
    MissingSource {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A relation was requested that has not been loaded
    #[error("Relation '{0}' has not been loaded")]
    UnknownRelation(String),

    /// A column was requested that the relation does not have
    #[error("Column '{column}' not found in {relation}")]
    ColumnNotFound {
        /// Relation (or batch description) that was searched
        relation: String,
        /// Missing column name
        column: String,
    },

    /// A column holds a type the operation cannot work with
    #[error("Column '{column}' is not a {expected} array")]
    ColumnType {
        /// Column name
        column: String,
        /// Expected logical type
        expected: String,
    },

    /// Error evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),
}

impl AnalyzerError {
    /// Create a filter error from a message
    pub fn filter_error(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create a column-not-found error
    pub fn column_not_found(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            relation: relation.into(),
            column: column.into(),
        }
    }
}

/// Result type for analyzer operations
pub type Result<T> = anyhow::Result<T>;
