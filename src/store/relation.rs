//! A named, immutable table held by the store

use anyhow::Context;
use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::arrow_utils::column_by_name;

/// A relation: one Arrow batch under a name
#[derive(Debug, Clone)]
pub struct Relation {
    name: String,
    batch: RecordBatch,
}

impl Relation {
    /// Wrap an existing batch
    #[must_use]
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }

    /// Concatenate reader batches into a single relation
    ///
    /// An empty `batches` list produces a zero-row relation with `schema`.
    pub fn from_batches(
        name: impl Into<String>,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<Self> {
        let name = name.into();
        let batch = concat_batches(&schema, batches)
            .with_context(|| format!("Failed to concatenate batches for relation '{name}'"))?;
        Ok(Self { name, batch })
    }

    /// Relation name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying batch
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Schema of the relation
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Look up a column by its case-sensitive name
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        column_by_name(&self.batch, name, &format!("relation '{}'", self.name))
    }
}
