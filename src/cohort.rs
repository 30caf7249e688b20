//! Patient cohorts: keyword selection, demographics and cross-cohort counts
//!
//! A cohort is the set of distinct patient identifiers behind the rows a
//! predicate selects. Cohorts keep the order in which patients were first
//! seen, which makes previews stable, but that order carries no meaning.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::algorithm::{
    JoinSide, JoinType, Projection, aggregate::group_count, inner_join, join,
};
use crate::error::Result;
use crate::filter::{Expr, KeywordSet, contains_filter, select};
use crate::schema::columns::{
    BODYSITE_DESCRIPTION, DESCRIPTION, GENDER, ID, MODALITY_DESCRIPTION, PATIENT, PATIENT_ID,
    RACE,
};
use crate::schema::{CONDITIONS, IMAGING_STUDIES, PATIENTS};
use crate::store::{Relation, Store};
use crate::utils::arrow_utils::{column_by_name, to_string_array};

/// A named set of distinct patient identifiers
#[derive(Debug, Clone)]
pub struct Cohort {
    name: String,
    ids: Vec<String>,
    members: FxHashSet<String>,
}

impl Cohort {
    /// Build a cohort from identifiers; duplicates are dropped
    pub fn from_ids<I, S>(name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cohort = Self {
            name: name.into(),
            ids: Vec::new(),
            members: FxHashSet::default(),
        };
        for id in ids {
            let id = id.into();
            if cohort.members.insert(id.clone()) {
                cohort.ids.push(id);
            }
        }
        cohort
    }

    /// Distinct non-null values of `column`
    pub fn from_column(name: impl Into<String>, batch: &RecordBatch, column: &str) -> Result<Self> {
        let ids = to_string_array(column_by_name(batch, column, "cohort rows")?)?;
        Ok(Self::from_ids(name, ids.iter().flatten()))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in first-seen order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// The cohort as a one-column batch
    pub fn to_batch(&self, column: &str) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![Field::new(column, DataType::Utf8, false)]));
        let ids: ArrayRef = Arc::new(StringArray::from_iter_values(&self.ids));
        Ok(RecordBatch::try_new(schema, vec![ids])?)
    }

    /// Patients in both cohorts, via an inner join on the identifier
    ///
    /// Members keep `self`'s order; as a set the result is commutative.
    pub fn intersect(&self, other: &Cohort) -> Result<Cohort> {
        let left = self.to_batch(PATIENT)?;
        let right = other.to_batch(ID)?;
        let keep = [Projection::keep(PATIENT)];

        let joined = inner_join(
            JoinSide::new(&left, PATIENT, &keep),
            JoinSide::new(&right, ID, &[]),
        )?;
        Cohort::from_column(format!("{} x {}", self.name, other.name), &joined, PATIENT)
    }
}

/// Rows selected by a predicate and the cohort they belong to
#[derive(Debug, Clone)]
pub struct CohortSelection {
    pub rows: RecordBatch,
    pub cohort: Cohort,
}

impl CohortSelection {
    /// Number of distinct rows over `columns` (e.g. distinct patient/description pairs)
    pub fn distinct_rows(&self, columns: &[&str]) -> Result<usize> {
        Ok(group_count(&self.rows, columns)?.len())
    }
}

/// Select rows of `relation` matching `expr` and collect their patients
pub fn select_cohort(name: &str, relation: &Relation, expr: &Expr) -> Result<CohortSelection> {
    let rows = select(relation, expr)?;
    let cohort = Cohort::from_column(name, &rows, PATIENT)?;
    info!(
        "Cohort '{name}': {} rows from {}, {} patients",
        rows.num_rows(),
        relation.name(),
        cohort.len()
    );
    Ok(CohortSelection { rows, cohort })
}

/// Rows whose `column` contains any keyword of `keywords`
pub fn select_by_keywords(
    relation: &Relation,
    column: &str,
    keywords: &KeywordSet,
) -> Result<CohortSelection> {
    select_cohort(keywords.name(), relation, &keywords.to_expr(column))
}

/// Patients with a CAD-like condition description
pub fn cad_cohort(store: &Store) -> Result<CohortSelection> {
    select_by_keywords(&*store.relation(CONDITIONS)?, DESCRIPTION, &KeywordSet::cad())
}

/// Predicate for echocardiograms: ultrasound of the heart
#[must_use]
pub fn echocardiogram_expr() -> Expr {
    Expr::And(vec![
        contains_filter(MODALITY_DESCRIPTION, "ultrasound"),
        contains_filter(BODYSITE_DESCRIPTION, "heart"),
    ])
}

/// Patients with at least one echocardiogram
pub fn echo_cohort(store: &Store) -> Result<CohortSelection> {
    select_cohort(
        "echocardiogram",
        &*store.relation(IMAGING_STUDIES)?,
        &echocardiogram_expr(),
    )
}

/// Attach `GENDER` and `RACE` to every cohort member
///
/// Output columns are `patient_id`, `GENDER`, `RACE`, one row per member;
/// members missing from `patients` get null demographics.
pub fn attach_demographics(cohort: &Cohort, patients: &Relation) -> Result<RecordBatch> {
    let members = cohort.to_batch(PATIENT)?;
    let left_cols = [Projection::rename(PATIENT, PATIENT_ID)];
    let right_cols = [Projection::keep(GENDER), Projection::keep(RACE)];

    join(
        JoinSide::new(&members, PATIENT, &left_cols),
        JoinSide::new(patients.batch(), ID, &right_cols),
        JoinType::LeftFirst,
    )
}

/// Patient count for one `(GENDER, RACE)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicCount {
    #[serde(rename = "GENDER")]
    pub gender: Option<String>,
    #[serde(rename = "RACE")]
    pub race: Option<String>,
    #[serde(rename = "Echocardiogram_Count")]
    pub count: usize,
}

/// CAD patients who had an echocardiogram, broken down by gender and race
#[derive(Debug, Clone)]
pub struct EchoBreakdown {
    pub cad_patients: usize,
    pub echo_patients: usize,
    pub both: Cohort,
    pub groups: Vec<DemographicCount>,
}

/// Group the members of `cohort` by `(GENDER, RACE)`
pub fn demographic_counts(cohort: &Cohort, patients: &Relation) -> Result<Vec<DemographicCount>> {
    let demographics = attach_demographics(cohort, patients)?;
    Ok(group_count(&demographics, &[GENDER, RACE])?
        .into_iter()
        .map(|group| {
            let mut key = group.key.into_iter();
            DemographicCount {
                gender: key.next().flatten(),
                race: key.next().flatten(),
                count: group.count,
            }
        })
        .collect())
}

/// Intersect the CAD and echocardiogram cohorts and count by demographics
pub fn cad_echo_breakdown(store: &Store) -> Result<EchoBreakdown> {
    let cad = cad_cohort(store)?.cohort;
    let echo = echo_cohort(store)?.cohort;
    let both = cad.intersect(&echo)?;
    let groups = demographic_counts(&both, &*store.relation(PATIENTS)?)?;

    Ok(EchoBreakdown {
        cad_patients: cad.len(),
        echo_patients: echo.len(),
        both,
        groups,
    })
}
