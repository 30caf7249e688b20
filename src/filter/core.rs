//! Core filtering functionality for relations
//!
//! Defines the [`BatchFilter`] trait and the mask application shared by all
//! filters.

use anyhow::Context;
use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch as arrow_filter_record_batch;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::error::filter_err;

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return filter_err(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ));
    }

    arrow_filter_record_batch(batch, mask).with_context(|| "Failed to apply boolean filter to batch")
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Boolean mask of the rows this filter keeps
    fn evaluate(&self, batch: &RecordBatch) -> Result<BooleanArray>;

    /// Filter a record batch
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.evaluate(batch)?;
        filter_record_batch(batch, &mask)
    }

    /// Number of rows this filter keeps
    fn count(&self, batch: &RecordBatch) -> Result<usize> {
        Ok(self.evaluate(batch)?.true_count())
    }
}
