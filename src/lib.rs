//! A Rust library for exploratory cohort analysis of synthetic patient
//! records: CSV ingestion into an Arrow-backed relation store, keyword
//! cohorts, demographic joins and frequency reports.

pub mod algorithm;
pub mod cohort;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod reports;
pub mod schema;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use store::{Relation, Store, with_store};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Loading and filtering
pub use filter::{Expr, KeywordSet};
pub use loader::{LoadSummary, load_csv, load_sources};

// Cohorts and reports
pub use cohort::{Cohort, DemographicCount, EchoBreakdown, cad_echo_breakdown};
pub use reports::{PrevalenceReport, ReportResult, run_battery, standard_battery};
