//! Group-by counting and frequency distributions
//!
//! Group keys are the string forms of the grouping columns; nulls form their
//! own group, so the counts of a full grouping always sum to the row count.

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::utils::arrow_utils::{column_by_name, string_value, to_string_array};

/// Values of the grouping columns for one group, in column order
pub type GroupKey = SmallVec<[Option<String>; 2]>;

/// Size of one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: GroupKey,
    pub count: usize,
}

/// Frequency of one distinct value of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: Option<String>,
    pub count: usize,
}

/// Count rows per distinct combination of `columns`
///
/// Groups are returned sorted by key; the order carries no meaning.
pub fn group_count(batch: &RecordBatch, columns: &[&str]) -> Result<Vec<GroupCount>> {
    let arrays = columns
        .iter()
        .map(|name| to_string_array(column_by_name(batch, name, "grouped batch")?))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: FxHashMap<GroupKey, usize> = FxHashMap::default();
    for row in 0..batch.num_rows() {
        let key: GroupKey = arrays
            .iter()
            .map(|array| string_value(array, row).map(str::to_string))
            .collect();
        *groups.entry(key).or_insert(0) += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .sorted_by(|a, b| a.key.cmp(&b.key))
        .collect())
}

/// Frequency distribution of a column, most frequent first
///
/// Ties are broken by value so the output is deterministic.
pub fn value_counts(batch: &RecordBatch, column: &str) -> Result<Vec<ValueCount>> {
    Ok(group_count(batch, &[column])?
        .into_iter()
        .map(|group| ValueCount {
            value: group.key.into_iter().next().flatten(),
            count: group.count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)))
        .collect())
}

/// The `n` most frequent values of a column
pub fn top_values(batch: &RecordBatch, column: &str, n: usize) -> Result<Vec<ValueCount>> {
    let mut counts = value_counts(batch, column)?;
    counts.truncate(n);
    Ok(counts)
}
