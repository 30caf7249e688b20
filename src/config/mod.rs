//! Configuration for the cohort analyzer.

use std::path::PathBuf;

use log::warn;

/// Default number of rows per CSV read batch
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Configuration for a cohort analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Directory holding the `<relation>.csv` source files
    pub data_dir: PathBuf,
    /// Directory the store persists relations to; `None` keeps them in memory
    pub store_dir: Option<PathBuf>,
    /// Rows per batch when reading CSV
    pub batch_size: usize,
    /// Infer column types from the data instead of reading everything as text
    pub infer_types: bool,
    /// Rows shown in head-of-table previews
    pub preview_rows: usize,
    /// Top-N cutoff for condition prevalence
    pub top_conditions: usize,
    /// Top-N cutoff for procedure prevalence
    pub top_procedures: usize,
    /// Top-N cutoff for imaging modality and body-site prevalence
    pub top_imaging: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("csv"),
            store_dir: Some(PathBuf::from("synthea_store")),
            batch_size: DEFAULT_BATCH_SIZE,
            infer_types: true,
            preview_rows: 5,
            top_conditions: 10,
            top_procedures: 10,
            top_imaging: 5,
        }
    }
}

impl AnalyzerConfig {
    /// Build a configuration from the defaults plus environment overrides
    ///
    /// Recognised variables: `COHORT_DATA_DIR`, `COHORT_STORE_DIR`,
    /// `COHORT_IN_MEMORY`, `COHORT_BATCH_SIZE`, `COHORT_INFER_TYPES`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("COHORT_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("COHORT_STORE_DIR") {
            self.store_dir = Some(PathBuf::from(dir));
        }
        if lookup("COHORT_IN_MEMORY").is_some_and(|v| parse_flag(&v)) {
            self.store_dir = None;
        }
        if let Some(raw) = lookup("COHORT_BATCH_SIZE") {
            match raw.parse::<usize>() {
                Ok(size) if size > 0 => self.batch_size = size,
                _ => warn!("Ignoring invalid COHORT_BATCH_SIZE value: {raw}"),
            }
        }
        if let Some(raw) = lookup("COHORT_INFER_TYPES") {
            self.infer_types = parse_flag(&raw);
        }
        self
    }

    /// Path of the CSV source for a relation
    #[must_use]
    pub fn source_path(&self, relation: &str) -> PathBuf {
        self.data_dir.join(format!("{relation}.csv"))
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
