//! Store manifest: which relations are persisted and where they came from

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// File name of the manifest inside a store directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Bookkeeping for one persisted relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Number of rows at load time
    pub rows: usize,
    /// Number of columns at load time
    pub columns: usize,
    /// Source file the relation was loaded from, if any
    pub source: Option<PathBuf>,
    /// When the relation was last replaced
    pub loaded_at: DateTime<Utc>,
}

/// All relations known to a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub relations: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Read the manifest from a store directory; a missing file is an empty manifest
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .map_err(AnalyzerError::Io)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&text)
            .map_err(AnalyzerError::Json)
            .with_context(|| format!("Malformed manifest {}", path.display()))?;
        Ok(manifest)
    }

    /// Write the manifest into a store directory
    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let text = serde_json::to_string_pretty(self).map_err(AnalyzerError::Json)?;
        fs::write(&path, text)
            .map_err(AnalyzerError::Io)
            .with_context(|| format!("Failed to write manifest {}", path.display()))
    }

    /// Record (or replace) the entry for a relation
    pub fn record(&mut self, name: &str, rows: usize, columns: usize, source: Option<&Path>) {
        self.relations.insert(
            name.to_string(),
            ManifestEntry {
                rows,
                columns,
                source: source.map(Path::to_path_buf),
                loaded_at: Utc::now(),
            },
        );
    }
}
