//! Relational building blocks for cohort queries
//!
//! Joins and group-by counting over Arrow batches.

pub mod aggregate;
pub mod join;

pub use aggregate::{GroupCount, GroupKey, ValueCount, group_count, top_values, value_counts};
pub use join::{JoinSide, JoinType, Projection, inner_join, join};
