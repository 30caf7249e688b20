//! Error helpers for the filter module

use anyhow::Context;

use crate::error::{AnalyzerError, Result};

/// Create a filter error
pub fn filter_err<T>(message: impl AsRef<str>) -> Result<T> {
    Err(AnalyzerError::filter_error(message.as_ref()).into())
}

/// Create a column not found error
pub fn column_not_found<T>(column_name: &str) -> Result<T> {
    Err(AnalyzerError::column_not_found("batch", column_name).into())
}

/// Extension trait adding filter-specific context to results
pub trait FilterResultExt<T> {
    /// Add context about the expression being evaluated
    fn with_expr_context(self, expr: impl std::fmt::Debug) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> FilterResultExt<T>
    for std::result::Result<T, E>
{
    fn with_expr_context(self, expr: impl std::fmt::Debug) -> Result<T> {
        self.with_context(|| format!("Error evaluating expression: {expr:?}"))
    }
}
