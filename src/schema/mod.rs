//! Relation and column names of the Synthea CSV extracts
//!
//! Column names are case-sensitive and follow the source files exactly.

use crate::error::Result;
use crate::store::Store;

pub const PATIENTS: &str = "patients";
pub const CONDITIONS: &str = "conditions";
pub const PROCEDURES: &str = "procedures";
pub const IMAGING_STUDIES: &str = "imaging_studies";
pub const ENCOUNTERS: &str = "encounters";

/// Every source relation, in load order
pub const SOURCES: [&str; 5] = [PATIENTS, CONDITIONS, PROCEDURES, IMAGING_STUDIES, ENCOUNTERS];

/// Column names used by the reports
pub mod columns {
    /// Patient identifier in `patients`
    pub const ID: &str = "Id";
    /// Patient reference in every clinical relation
    pub const PATIENT: &str = "PATIENT";
    /// Patient identifier as exposed by demographic joins
    pub const PATIENT_ID: &str = "patient_id";
    pub const GENDER: &str = "GENDER";
    pub const RACE: &str = "RACE";
    pub const BIRTHDATE: &str = "BIRTHDATE";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    /// Onset date in `conditions`
    pub const START: &str = "START";
    pub const MODALITY_DESCRIPTION: &str = "MODALITY_DESCRIPTION";
    pub const BODYSITE_DESCRIPTION: &str = "BODYSITE_DESCRIPTION";
}

/// Columns a relation must have for the reports to run
#[must_use]
pub fn required_columns(relation: &str) -> &'static [&'static str] {
    use columns::*;
    match relation {
        PATIENTS => &[ID, GENDER, RACE, BIRTHDATE],
        CONDITIONS => &[PATIENT, DESCRIPTION, START],
        PROCEDURES => &[PATIENT, DESCRIPTION],
        IMAGING_STUDIES => &[PATIENT, MODALITY_DESCRIPTION, BODYSITE_DESCRIPTION],
        ENCOUNTERS => &[PATIENT],
        _ => &[],
    }
}

/// A required column missing from a loaded relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub relation: String,
    pub column: String,
}

/// List required columns missing from the loaded source relations
pub fn check_relations(store: &Store) -> Result<Vec<SchemaIssue>> {
    let mut issues = Vec::new();
    for relation in SOURCES {
        let schema = store.relation(relation)?.schema();
        for column in required_columns(relation) {
            if schema.index_of(column).is_err() {
                issues.push(SchemaIssue {
                    relation: relation.to_string(),
                    column: (*column).to_string(),
                });
            }
        }
    }
    Ok(issues)
}

/// Fail if any source relation lacks a required column
pub fn ensure_required_columns(store: &Store) -> Result<()> {
    let issues = check_relations(store)?;
    if issues.is_empty() {
        return Ok(());
    }

    let missing = issues
        .iter()
        .map(|issue| format!("{}.{}", issue.relation, issue.column))
        .collect::<Vec<_>>()
        .join(", ");
    Err(anyhow::anyhow!("Source relations are missing required columns: {missing}"))
}
