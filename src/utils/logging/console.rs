//! Console output utilities
//!
//! Report output goes to stdout as plain text; these helpers keep the
//! formatting in one place.

use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::arrow_utils::format_head;

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("\n{title}");
}

/// Print the first `num_rows` rows of a batch as a table
pub fn print_head(batch: &RecordBatch, num_rows: usize) -> Result<()> {
    println!("{}", format_head(batch, num_rows)?);
    Ok(())
}

/// Print `(label, count)` pairs as an aligned two-column listing
pub fn print_counts<'a, I>(rows: I)
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let rows: Vec<(&str, usize)> = rows.into_iter().collect();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, count) in rows {
        println!("{label:<width$}  {count}");
    }
}
