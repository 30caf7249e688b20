//! Arrow utility functions for column access and conversions
//!
//! Relations keep whatever types CSV inference produced, so joins and
//! group-bys normalise key columns to strings through these helpers.

use anyhow::Context;
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::{AnalyzerError, Result};

/// Look up a column by name
///
/// # Arguments
/// * `batch` - The record batch to search
/// * `name` - Column name (case-sensitive)
/// * `context` - What the batch is, for the error message
pub fn column_by_name<'a>(batch: &'a RecordBatch, name: &str, context: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| AnalyzerError::column_not_found(context, name))?;
    Ok(batch.column(idx))
}

/// Convert any castable column to a `StringArray`, keeping nulls
pub fn to_string_array(array: &ArrayRef) -> Result<StringArray> {
    if let Some(strings) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(strings.clone());
    }

    let converted = cast(array, &DataType::Utf8)
        .with_context(|| format!("Failed to cast {} column to strings", array.data_type()))?;

    converted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Failed to downcast string array"))
}

/// Extract a string value from a `StringArray`, handling nulls
#[must_use]
pub fn string_value(array: &StringArray, index: usize) -> Option<&str> {
    if array.is_null(index) {
        None
    } else {
        Some(array.value(index))
    }
}

/// Number of non-null values in every column of a batch, in schema order
///
/// Uses logical nulls, so every slot of a `Null` column counts as null.
#[must_use]
pub fn non_null_counts(batch: &RecordBatch) -> Vec<(String, usize)> {
    batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, column)| {
            (field.name().clone(), column.len() - column.logical_null_count())
        })
        .collect()
}

/// Render the first `num_rows` rows of a batch as a text table
pub fn format_head(batch: &RecordBatch, num_rows: usize) -> Result<String> {
    let head = batch.slice(0, num_rows.min(batch.num_rows()));
    let table = pretty_format_batches(&[head]).context("Failed to format record batch")?;
    Ok(table.to_string())
}
