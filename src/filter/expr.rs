//! Expression-based filtering for relations
//!
//! Predicates are plain data ([`Expr`]) evaluated against an Arrow batch into
//! a boolean mask. Null values never satisfy a comparison.

use arrow::array::{Array, BooleanArray};
use arrow::compute::{and, or};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::core::BatchFilter;
use crate::filter::error::{FilterResultExt, column_not_found};
use crate::utils::arrow_utils::{string_value, to_string_array};

/// Represents a filter expression over the columns of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Column value contains a substring, ignoring case
    ContainsIgnoreCase(String, String),

    /// Logical AND of expressions; empty is true
    And(Vec<Expr>),

    /// Logical OR of expressions; empty is false
    Or(Vec<Expr>),
}

impl Expr {
    /// Evaluate the expression into a row mask
    pub fn evaluate(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        match self {
            Self::And(exprs) => evaluate_and(batch, exprs),
            Self::Or(exprs) => evaluate_or(batch, exprs),
            Self::ContainsIgnoreCase(col, needle) => {
                let needle = needle.to_lowercase();
                string_mask(batch, col, |v| {
                    v.is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

fn evaluate_and(batch: &RecordBatch, exprs: &[Expr]) -> Result<BooleanArray> {
    let Some((first, rest)) = exprs.split_first() else {
        return Ok(BooleanArray::from(vec![true; batch.num_rows()]));
    };

    let mut result = first.evaluate(batch)?;
    for expr in rest {
        let mask = expr.evaluate(batch)?;
        result = and(&result, &mask).with_expr_context(expr)?;
    }
    Ok(result)
}

fn evaluate_or(batch: &RecordBatch, exprs: &[Expr]) -> Result<BooleanArray> {
    let Some((first, rest)) = exprs.split_first() else {
        return Ok(BooleanArray::from(vec![false; batch.num_rows()]));
    };

    let mut result = first.evaluate(batch)?;
    for expr in rest {
        let mask = expr.evaluate(batch)?;
        result = or(&result, &mask).with_expr_context(expr)?;
    }
    Ok(result)
}

/// Build a mask by applying `predicate` to every value of a column
///
/// Non-string columns (including all-null `Null` columns) are cast to
/// strings first.
fn string_mask<F>(batch: &RecordBatch, col_name: &str, predicate: F) -> Result<BooleanArray>
where
    F: Fn(Option<&str>) -> bool,
{
    let Ok(idx) = batch.schema().index_of(col_name) else {
        return column_not_found(col_name);
    };
    let values = to_string_array(batch.column(idx))?;

    Ok((0..values.len())
        .map(|i| Some(predicate(string_value(&values, i))))
        .collect())
}

/// A filter that evaluates an expression against a record batch
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }
}

impl BatchFilter for ExpressionFilter {
    fn evaluate(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        self.expr.evaluate(batch)
    }
}

/// Helper function to create a case-insensitive substring filter
#[must_use]
pub fn contains_filter(column: &str, needle: &str) -> Expr {
    Expr::ContainsIgnoreCase(column.to_string(), needle.to_string())
}
