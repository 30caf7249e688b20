//! CSV ingestion into the store
//!
//! Each source file becomes one relation, replacing any relation of the same
//! name. A missing or malformed file aborts the load.

use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::config::AnalyzerConfig;
use crate::error::util::safe_open_file;
use crate::error::{AnalyzerError, Result};
use crate::schema::SOURCES;
use crate::store::Store;
use crate::utils::logging::{
    finish_load_progress, load_progress, log_operation_start, log_relation_ready, source_loaded,
};

/// Outcome of loading one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub relation: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Read a CSV file (with header row) into Arrow batches
///
/// With `infer_types` off, every column is read as `Utf8`. Columns without
/// a single value are always `Utf8`.
pub fn read_csv(
    path: &Path,
    batch_size: usize,
    infer_types: bool,
) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let mut file = safe_open_file(path, "reading CSV source")?;

    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .map_err(AnalyzerError::Arrow)
        .with_context(|| format!("Failed to infer CSV schema of {}", path.display()))?;
    file.rewind()
        .map_err(AnalyzerError::Io)
        .with_context(|| format!("Failed to rewind {}", path.display()))?;

    // Columns with no values at all infer as `Null`; read those as text too
    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| {
                if !infer_types || f.data_type() == &DataType::Null {
                    Field::new(f.name(), DataType::Utf8, true)
                } else {
                    Field::clone(f)
                }
            })
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(batch_size)
        .build(file)
        .map_err(AnalyzerError::Arrow)
        .with_context(|| format!("Failed to build CSV reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(AnalyzerError::Arrow)
            .with_context(|| format!("Malformed CSV data in {}", path.display()))?;
        batches.push(batch);
    }

    Ok((schema, batches))
}

/// Load one CSV file as relation `name`, replacing any previous relation
pub fn load_csv(
    store: &mut Store,
    name: &str,
    path: &Path,
    config: &AnalyzerConfig,
) -> Result<LoadSummary> {
    let start = Instant::now();
    log_operation_start(&format!("Loading relation '{name}' from"), path);

    let (schema, batches) = read_csv(path, config.batch_size, config.infer_types)?;
    let columns = schema.fields().len();
    let rows = store
        .put(name, schema, batches, Some(path))
        .with_context(|| format!("Failed to store relation '{name}'"))?;

    log_relation_ready(name, path, rows, columns, start.elapsed());
    Ok(LoadSummary {
        relation: name.to_string(),
        path: path.to_path_buf(),
        rows,
        columns,
    })
}

/// Load all five source relations from `config.data_dir`
pub fn load_sources(store: &mut Store, config: &AnalyzerConfig) -> Result<Vec<LoadSummary>> {
    let progress = load_progress(SOURCES.len());
    let mut summaries = Vec::with_capacity(SOURCES.len());

    for name in SOURCES {
        progress.set_message(format!("Loading {name}"));
        let path = config.source_path(name);
        match load_csv(store, name, &path, config) {
            Ok(summary) => {
                source_loaded(&progress, name, summary.rows);
                summaries.push(summary);
            }
            Err(e) => {
                progress.abandon_with_message(format!("Failed to load {name}"));
                return Err(e);
            }
        }
    }

    finish_load_progress(&progress, "All sources loaded");
    Ok(summaries)
}
