//! Turning report rows into Arrow tables for display

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;

/// Serialize report rows into a record batch, one column per struct field
pub fn to_table<T>(rows: &[T]) -> Result<RecordBatch>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let fields = Vec::<FieldRef>::from_type::<T>(TracingOptions::default().allow_null_fields(true))
        .map_err(|e| anyhow::anyhow!("Schema generation error: {}", e))?;

    serde_arrow::to_record_batch(&fields, &rows)
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
}
