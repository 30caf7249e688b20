//! Log lines for store and report operations
//!
//! Everything goes through the `log` facade; `main` installs `env_logger`.

use std::path::Path;
use std::time::Duration;

use log::{info, warn};

/// Log the start of an operation on a file or directory
pub fn log_operation_start(operation: &str, path: &Path) {
    info!("{operation} {}", path.display());
}

/// Log a relation that has been materialized, with its shape and timing
pub fn log_relation_ready(relation: &str, source: &Path, rows: usize, columns: usize, elapsed: Duration) {
    info!(
        "Relation '{relation}' ready: {rows} rows x {columns} columns from {} in {elapsed:?}",
        source.display()
    );
}

/// Log a finished report
pub fn log_report_complete(report: &str, rows: usize, elapsed: Duration) {
    info!("Report '{report}' produced {rows} rows in {elapsed:?}");
}

/// Log a warning, optionally naming the path it concerns
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => warn!("{message}: {}", path.display()),
        None => warn!("{message}"),
    }
}
