//! Hash joins between relations on a single string key
//!
//! Keys are compared as strings (non-string key columns are cast), and null
//! keys never match. Output columns are chosen with [`Projection`]s so the
//! caller controls names such as `patient_id` versus `PATIENT`.

use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, StringArray, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::Result;
use crate::utils::arrow_utils::{column_by_name, to_string_array};

/// How unmatched and multiply-matched left rows are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Only left rows with at least one match; one output row per match
    Inner,
    /// Every left row exactly once, paired with its first match (or nulls)
    LeftFirst,
}

/// A column carried into the join output, optionally renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub source: String,
    pub output: String,
}

impl Projection {
    /// Keep a column under its own name
    #[must_use]
    pub fn keep(name: &str) -> Self {
        Self {
            source: name.to_string(),
            output: name.to_string(),
        }
    }

    /// Carry `source` into the output as `output`
    #[must_use]
    pub fn rename(source: &str, output: &str) -> Self {
        Self {
            source: source.to_string(),
            output: output.to_string(),
        }
    }
}

/// One side of a join: a batch, its key column and the columns to keep
#[derive(Debug, Clone, Copy)]
pub struct JoinSide<'a> {
    pub batch: &'a RecordBatch,
    pub key: &'a str,
    pub columns: &'a [Projection],
}

impl<'a> JoinSide<'a> {
    #[must_use]
    pub fn new(batch: &'a RecordBatch, key: &'a str, columns: &'a [Projection]) -> Self {
        Self {
            batch,
            key,
            columns,
        }
    }
}

/// Join `left` with `right` where the key columns are equal
pub fn join(left: JoinSide<'_>, right: JoinSide<'_>, join_type: JoinType) -> Result<RecordBatch> {
    let duplicates: Vec<&str> = left
        .columns
        .iter()
        .chain(right.columns)
        .map(|p| p.output.as_str())
        .duplicates()
        .collect();
    if !duplicates.is_empty() {
        return Err(anyhow::anyhow!(
            "Join output has duplicate column names: {}",
            duplicates.join(", ")
        ));
    }

    let left_keys = to_string_array(column_by_name(left.batch, left.key, "left side of join")?)?;
    let right_keys =
        to_string_array(column_by_name(right.batch, right.key, "right side of join")?)?;

    let index = build_index(&right_keys)?;
    let (left_indices, right_indices) = match_rows(&left_keys, &index, join_type)?;

    let mut fields = Vec::with_capacity(left.columns.len() + right.columns.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

    for projection in left.columns {
        let (field, column) = project(left.batch, projection, &left_indices, false)?;
        fields.push(field);
        columns.push(column);
    }
    let right_nullable = join_type != JoinType::Inner;
    for projection in right.columns {
        let (field, column) = project(right.batch, projection, &right_indices, right_nullable)?;
        fields.push(field);
        columns.push(column);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("Failed to assemble joined record batch")
}

/// Inner join on equal keys
pub fn inner_join(left: JoinSide<'_>, right: JoinSide<'_>) -> Result<RecordBatch> {
    join(left, right, JoinType::Inner)
}

type RowIndex<'a> = FxHashMap<&'a str, SmallVec<[u32; 2]>>;

fn row_index(i: usize) -> Result<u32> {
    u32::try_from(i).context("Relation too large to join")
}

fn build_index(keys: &StringArray) -> Result<RowIndex<'_>> {
    let mut index: RowIndex<'_> = FxHashMap::default();
    for (i, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            index.entry(key).or_default().push(row_index(i)?);
        }
    }
    Ok(index)
}

fn match_rows(
    left_keys: &StringArray,
    index: &RowIndex<'_>,
    join_type: JoinType,
) -> Result<(UInt32Array, UInt32Array)> {
    let mut left_indices: Vec<u32> = Vec::with_capacity(left_keys.len());
    let mut right_indices: Vec<Option<u32>> = Vec::with_capacity(left_keys.len());

    for (i, key) in left_keys.iter().enumerate() {
        let i = row_index(i)?;
        let matches = key.and_then(|k| index.get(k));

        match (matches, join_type) {
            (Some(rows), JoinType::Inner) => {
                for &j in rows {
                    left_indices.push(i);
                    right_indices.push(Some(j));
                }
            }
            (Some(rows), JoinType::LeftFirst) => {
                left_indices.push(i);
                right_indices.push(rows.first().copied());
            }
            (None, JoinType::Inner) => {}
            (None, JoinType::LeftFirst) => {
                left_indices.push(i);
                right_indices.push(None);
            }
        }
    }

    Ok((UInt32Array::from(left_indices), UInt32Array::from(right_indices)))
}

fn project(
    batch: &RecordBatch,
    projection: &Projection,
    indices: &UInt32Array,
    force_nullable: bool,
) -> Result<(Field, ArrayRef)> {
    let schema = batch.schema();
    let idx = schema
        .index_of(&projection.source)
        .map_err(|_| {
            crate::error::AnalyzerError::column_not_found("join input", &projection.source)
        })?;
    let source_field = schema.field(idx);

    let column = take(batch.column(idx), indices, None)
        .with_context(|| format!("Failed to gather column '{}'", projection.source))?;
    let field = Field::new(
        &projection.output,
        source_field.data_type().clone(),
        source_field.is_nullable() || force_nullable,
    );
    Ok((field, column))
}
