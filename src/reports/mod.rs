//! Reports run against a loaded store
//!
//! Every report reads relations from the store and returns plain rows; the
//! `print_*` helpers render them on stdout.

pub mod battery;
pub mod prevalence;
pub mod render;

pub use battery::{ColumnCount, ReportResult, ReportSpec, run_battery, run_report, standard_battery};
pub use prevalence::{
    KeywordCount, PrevalenceReport, PrevalenceSpec, keyword_match_counts, prevalence,
    standard_prevalence_specs, target_procedure_counts,
};
pub use render::to_table;

use crate::error::Result;
use crate::utils::logging::console::{print_counts, print_head, print_heading};

/// Print a frequency table
pub fn print_prevalence(report: &PrevalenceReport) -> Result<()> {
    print_heading(&format!(
        "{} ({} rows in {})",
        report.title, report.total_rows, report.relation
    ));
    print_head(&to_table(&report.top)?, report.top.len())
}

/// Print `'<keyword>' matches: <n>` per keyword
pub fn print_keyword_counts(counts: &[KeywordCount]) {
    for count in counts {
        println!("'{}' matches: {}", count.keyword, count.matches);
    }
}

/// Print a report's row count and non-null count per column
pub fn print_report(result: &ReportResult) {
    print_heading(&format!("{} ({} rows)", result.name, result.rows));
    print_counts(
        result
            .non_null
            .iter()
            .map(|c| (c.column.as_str(), c.non_null)),
    );
}
