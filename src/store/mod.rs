//! The relational store: named relations, optionally persisted to disk
//!
//! A [`Store`] is created explicitly and passed to every operation that reads
//! relations. Use [`with_store`] to scope a run so the manifest is flushed and
//! the handle released on every exit path.

pub mod manifest;
pub mod persist;
pub mod relation;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use log::{debug, info};

use crate::config::AnalyzerConfig;
use crate::error::util::ensure_directory;
use crate::error::{AnalyzerError, Result};
use crate::utils::logging::log_warning;

pub use manifest::{Manifest, ManifestEntry};
pub use relation::Relation;

/// Handle to the set of loaded relations
///
/// Relations persisted by an earlier run are read from disk on first use, so
/// a run that replaces them never touches the old files.
#[derive(Debug)]
pub struct Store {
    root: Option<PathBuf>,
    relations: RefCell<BTreeMap<String, Arc<Relation>>>,
    manifest: Manifest,
}

impl Store {
    /// A store that never touches disk
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            root: None,
            relations: RefCell::new(BTreeMap::new()),
            manifest: Manifest::default(),
        }
    }

    /// Open (or create) a persistent store directory
    ///
    /// Only the manifest is read here. Entries whose Parquet file has gone
    /// missing are dropped with a warning.
    pub fn open(dir: &Path) -> Result<Self> {
        ensure_directory(dir, "relation store")?;
        let mut manifest = Manifest::read(dir)?;

        manifest.relations.retain(|name, _| {
            let present = persist::relation_path(dir, name).exists();
            if !present {
                log_warning(
                    &format!("Relation '{name}' is in the manifest but its file is missing"),
                    Some(dir),
                );
            }
            present
        });

        info!(
            "Opened store {} with {} persisted relations",
            dir.display(),
            manifest.relations.len()
        );

        Ok(Self {
            root: Some(dir.to_path_buf()),
            relations: RefCell::new(BTreeMap::new()),
            manifest,
        })
    }

    /// Store directory, if the store is persistent
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.root.is_some()
    }

    /// Materialize batches as the relation `name`, replacing any previous one
    ///
    /// Returns the row count of the new relation.
    pub fn put(
        &mut self,
        name: &str,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
        source: Option<&Path>,
    ) -> Result<usize> {
        let relation = Relation::from_batches(name, schema, &batches)?;
        let rows = relation.num_rows();

        if let Some(root) = &self.root {
            persist::write_relation(root, &relation)?;
        }
        if self.manifest.relations.contains_key(name) {
            debug!("Replacing relation '{name}'");
        }

        self.manifest.record(name, rows, relation.num_columns(), source);
        self.relations
            .get_mut()
            .insert(name.to_string(), Arc::new(relation));
        Ok(rows)
    }

    /// Fetch a relation, reading it from disk if it was persisted earlier
    pub fn relation(&self, name: &str) -> Result<Arc<Relation>> {
        if let Some(relation) = self.relations.borrow().get(name) {
            return Ok(Arc::clone(relation));
        }

        match &self.root {
            Some(root) if self.manifest.relations.contains_key(name) => {
                let relation = Arc::new(persist::read_relation(root, name)?);
                self.relations
                    .borrow_mut()
                    .insert(name.to_string(), Arc::clone(&relation));
                Ok(relation)
            }
            _ => Err(AnalyzerError::UnknownRelation(name.to_string()).into()),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.manifest.relations.contains_key(name)
    }

    /// Names of all known relations, sorted
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.manifest.relations.keys().map(String::as_str)
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Write the manifest of a persistent store; a no-op in memory
    pub fn flush(&self) -> Result<()> {
        match &self.root {
            Some(root) => self.manifest.write(root),
            None => Ok(()),
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        match &self.root {
            Some(root) => debug!("Releasing store {}", root.display()),
            None => debug!("Releasing in-memory store"),
        }
    }
}

/// Run `f` against a store opened from `config`
///
/// The manifest is flushed whether or not `f` succeeds; an error from `f`
/// takes precedence over a flush error.
pub fn with_store<T, F>(config: &AnalyzerConfig, f: F) -> Result<T>
where
    F: FnOnce(&mut Store) -> Result<T>,
{
    let mut store = match &config.store_dir {
        Some(dir) => Store::open(dir)?,
        None => Store::in_memory(),
    };

    let result = f(&mut store);
    let flushed = store.flush();
    drop(store);

    let value = result?;
    flushed?;
    Ok(value)
}
