//! Parquet persistence for relations
//!
//! Each relation is stored as `<dir>/<name>.parquet`. Writes go to a
//! temporary file first and are renamed into place, so a reload either sees
//! the previous relation or the new one.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::util::safe_open_file;
use crate::error::{AnalyzerError, Result};
use crate::store::relation::Relation;
use crate::utils::logging::{log_operation_start, log_relation_ready};

/// Path of the Parquet file backing a relation
#[must_use]
pub fn relation_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.parquet"))
}

/// Write a relation, replacing any previous file
pub fn write_relation(dir: &Path, relation: &Relation) -> Result<PathBuf> {
    let path = relation_path(dir, relation.name());
    let tmp_path = path.with_extension("parquet.tmp");

    let file = File::create(&tmp_path)
        .map_err(AnalyzerError::Io)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;

    let mut writer = ArrowWriter::try_new(file, relation.schema(), None)
        .map_err(AnalyzerError::Parquet)
        .with_context(|| format!("Failed to create parquet writer for {}", path.display()))?;
    writer
        .write(relation.batch())
        .map_err(AnalyzerError::Parquet)
        .with_context(|| format!("Failed to write relation '{}'", relation.name()))?;
    writer
        .close()
        .map_err(AnalyzerError::Parquet)
        .with_context(|| format!("Failed to finish {}", tmp_path.display()))?;

    fs::rename(&tmp_path, &path)
        .map_err(AnalyzerError::Io)
        .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;

    Ok(path)
}

/// Read a persisted relation back into memory
pub fn read_relation(dir: &Path, name: &str) -> Result<Relation> {
    let start = std::time::Instant::now();
    let path = relation_path(dir, name);
    log_operation_start("Reading persisted relation", &path);

    let file = safe_open_file(&path, "reading persisted relation")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(AnalyzerError::Parquet)
        .with_context(|| format!("Failed to read parquet file: {}", path.display()))?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .map_err(AnalyzerError::Parquet)
        .with_context(|| format!("Failed to build parquet reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(AnalyzerError::Arrow)
            .with_context(|| format!("Failed to read record batch from {}", path.display()))?;
        batches.push(batch);
    }

    let relation = Relation::from_batches(name, schema, &batches)?;
    log_relation_ready(
        name,
        &path,
        relation.num_rows(),
        relation.num_columns(),
        start.elapsed(),
    );
    Ok(relation)
}
