//! The fixed battery of ad-hoc clinical reports
//!
//! Each report filters one clinical relation with a keyword predicate, joins
//! the surviving rows to `patients` and summarises the result as non-null
//! counts per column. Reports do not depend on each other.

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::algorithm::{JoinSide, Projection, inner_join};
use crate::error::Result;
use crate::filter::{Expr, KeywordSet, select};
use crate::schema::columns::{
    BIRTHDATE, DESCRIPTION, GENDER, ID, MODALITY_DESCRIPTION, PATIENT, RACE, START,
};
use crate::schema::{CONDITIONS, IMAGING_STUDIES, PATIENTS, PROCEDURES};
use crate::store::Store;
use crate::utils::arrow_utils::non_null_counts;
use crate::utils::logging::log_report_complete;

/// Definition of one report
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub name: String,
    /// Clinical relation the predicate is applied to
    pub relation: &'static str,
    pub predicate: Expr,
    /// Columns kept from the clinical relation
    pub columns: Vec<Projection>,
    /// Columns kept from `patients`
    pub patient_columns: Vec<Projection>,
}

impl ReportSpec {
    fn keyword_report(
        name: &str,
        relation: &'static str,
        column: &str,
        keywords: &KeywordSet,
        columns: &[&str],
        patient_columns: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            relation,
            predicate: keywords.to_expr(column),
            columns: columns.iter().map(|c| Projection::keep(c)).collect(),
            patient_columns: patient_columns.iter().map(|c| Projection::keep(c)).collect(),
        }
    }
}

/// Non-null values in one output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCount {
    pub column: String,
    pub non_null: usize,
}

/// Output of one report
#[derive(Debug, Clone)]
pub struct ReportResult {
    pub name: String,
    pub rows: usize,
    pub non_null: Vec<ColumnCount>,
    pub batch: RecordBatch,
}

/// The four standard reports
#[must_use]
pub fn standard_battery() -> Vec<ReportSpec> {
    vec![
        ReportSpec::keyword_report(
            "Hypertension and diabetes by gender and race",
            CONDITIONS,
            DESCRIPTION,
            &KeywordSet::hypertension_diabetes(),
            &[PATIENT, DESCRIPTION],
            &[GENDER, RACE],
        ),
        ReportSpec::keyword_report(
            "Ultrasound imaging by gender and race",
            IMAGING_STUDIES,
            MODALITY_DESCRIPTION,
            &KeywordSet::ultrasound(),
            &[PATIENT, MODALITY_DESCRIPTION],
            &[GENDER, RACE],
        ),
        ReportSpec::keyword_report(
            "Coronary diagnoses with birth and onset dates",
            CONDITIONS,
            DESCRIPTION,
            &KeywordSet::cad(),
            &[PATIENT, DESCRIPTION, START],
            &[BIRTHDATE],
        ),
        ReportSpec::keyword_report(
            "CT procedures by gender",
            PROCEDURES,
            DESCRIPTION,
            &KeywordSet::ct(),
            &[PATIENT, DESCRIPTION],
            &[GENDER],
        ),
    ]
}

/// Run one report against the store
pub fn run_report(store: &Store, spec: &ReportSpec) -> Result<ReportResult> {
    let start = Instant::now();
    let relation = store.relation(spec.relation)?;
    let patients = store.relation(PATIENTS)?;

    let selected = select(&relation, &spec.predicate)?;
    let batch = inner_join(
        JoinSide::new(&selected, PATIENT, &spec.columns),
        JoinSide::new(patients.batch(), ID, &spec.patient_columns),
    )?;

    let non_null = non_null_counts(&batch)
        .into_iter()
        .map(|(column, non_null)| ColumnCount { column, non_null })
        .collect();
    log_report_complete(&spec.name, batch.num_rows(), start.elapsed());

    Ok(ReportResult {
        name: spec.name.clone(),
        rows: batch.num_rows(),
        non_null,
        batch,
    })
}

/// Run every report in order, stopping at the first failure
pub fn run_battery(store: &Store, specs: &[ReportSpec]) -> Result<Vec<ReportResult>> {
    specs.iter().map(|spec| run_report(store, spec)).collect()
}
