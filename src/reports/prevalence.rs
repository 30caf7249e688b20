//! Frequency reports over free-text description columns

use serde::{Deserialize, Serialize};

use crate::algorithm::{ValueCount, top_values};
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::filter::{KeywordSet, contains_filter, count};
use crate::schema::columns::{BODYSITE_DESCRIPTION, DESCRIPTION, MODALITY_DESCRIPTION};
use crate::schema::{CONDITIONS, IMAGING_STUDIES, PROCEDURES};
use crate::store::{Relation, Store};

/// Which column to profile and how many values to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevalenceSpec {
    pub title: String,
    pub relation: &'static str,
    pub column: &'static str,
    pub top_n: usize,
}

/// The most frequent values of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevalenceReport {
    pub title: String,
    pub relation: String,
    pub column: String,
    pub total_rows: usize,
    pub top: Vec<ValueCount>,
}

/// Conditions, procedures, imaging modalities and body sites
#[must_use]
pub fn standard_prevalence_specs(config: &AnalyzerConfig) -> Vec<PrevalenceSpec> {
    let spec = |title: &str, relation, column, top_n| PrevalenceSpec {
        title: title.to_string(),
        relation,
        column,
        top_n,
    };

    vec![
        spec("Most common conditions", CONDITIONS, DESCRIPTION, config.top_conditions),
        spec("Most common procedures", PROCEDURES, DESCRIPTION, config.top_procedures),
        spec(
            "Most common imaging modalities",
            IMAGING_STUDIES,
            MODALITY_DESCRIPTION,
            config.top_imaging,
        ),
        spec(
            "Most common imaging body sites",
            IMAGING_STUDIES,
            BODYSITE_DESCRIPTION,
            config.top_imaging,
        ),
    ]
}

/// Run one prevalence report
pub fn prevalence(store: &Store, spec: &PrevalenceSpec) -> Result<PrevalenceReport> {
    let relation = store.relation(spec.relation)?;
    Ok(PrevalenceReport {
        title: spec.title.clone(),
        relation: spec.relation.to_string(),
        column: spec.column.to_string(),
        total_rows: relation.num_rows(),
        top: top_values(relation.batch(), spec.column, spec.top_n)?,
    })
}

/// Rows matching one keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub matches: usize,
}

/// Count matches of each keyword on its own (not OR-ed)
pub fn keyword_match_counts(
    relation: &Relation,
    column: &str,
    keywords: &KeywordSet,
) -> Result<Vec<KeywordCount>> {
    keywords
        .keywords()
        .iter()
        .map(|keyword| {
            Ok(KeywordCount {
                keyword: keyword.clone(),
                matches: count(relation, &contains_filter(column, keyword))?,
            })
        })
        .collect()
}

/// Procedure rows matching each diagnostic-test keyword
pub fn target_procedure_counts(store: &Store) -> Result<Vec<KeywordCount>> {
    keyword_match_counts(
        &*store.relation(PROCEDURES)?,
        DESCRIPTION,
        &KeywordSet::target_procedures(),
    )
}
