//! Logging, progress and console output

pub mod console;
pub mod log;
pub mod progress;

pub use self::log::{log_operation_start, log_relation_ready, log_report_complete, log_warning};
pub use progress::{finish_load_progress, load_progress, source_loaded};
