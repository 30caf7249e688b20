//! Row filtering for relations
//!
//! Predicates are [`Expr`] values evaluated to boolean masks; keyword cohort
//! definitions are [`KeywordSet`]s compiled into expressions.

pub mod core;
pub mod error;
pub mod expr;
pub mod keywords;

pub use self::core::{BatchFilter, filter_record_batch};
pub use expr::{Expr, ExpressionFilter, contains_filter};
pub use keywords::KeywordSet;

use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::store::Relation;

/// Rows of `relation` satisfying `expr`
pub fn select(relation: &Relation, expr: &Expr) -> Result<RecordBatch> {
    ExpressionFilter::new(expr.clone()).filter(relation.batch())
}

/// Number of rows of `relation` satisfying `expr`
pub fn count(relation: &Relation, expr: &Expr) -> Result<usize> {
    ExpressionFilter::new(expr.clone()).count(relation.batch())
}
