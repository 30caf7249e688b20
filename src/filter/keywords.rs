//! Keyword sets: lexical cohort definitions over free-text columns
//!
//! A keyword set selects a row when its text contains any keyword, ignoring
//! case. Sets are data; they compile to an [`Expr`] rather than query text.
//! The fixed sets below are loose heuristics: `ct` matches any word
//! containing those letters.

use itertools::Itertools;

use crate::filter::expr::{Expr, contains_filter};
use crate::utils::logging::log_warning;

/// Coronary artery disease
pub const CAD_KEYWORDS: &[&str] = &[
    "coronary",
    "artery",
    "cad",
    "heart disease",
    "atherosclerosis",
];

pub const HYPERTENSION_DIABETES_KEYWORDS: &[&str] = &["hypertension", "diabetes"];

pub const ULTRASOUND_KEYWORDS: &[&str] = &["ultrasound"];

pub const CT_KEYWORDS: &[&str] = &["ct"];

/// Procedure descriptions of the diagnostic tests of interest for CAD
pub const TARGET_PROCEDURE_KEYWORDS: &[&str] = &[
    "computed tomography",
    "ultrasound",
    "calcium",
    "ct angiography",
    "thoracic",
];

/// A named set of case-insensitive substring keywords, OR-ed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    name: String,
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a set; keywords are lowercased and deduplicated, blanks dropped
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let keywords = keywords
            .into_iter()
            .filter_map(|k| {
                let k = k.as_ref();
                if k.trim().is_empty() {
                    log_warning(&format!("Dropping blank keyword from set '{name}'"), None);
                    None
                } else {
                    Some(k.to_lowercase())
                }
            })
            .unique()
            .collect();
        Self { name, keywords }
    }

    #[must_use]
    pub fn cad() -> Self {
        Self::new("CAD", CAD_KEYWORDS)
    }

    #[must_use]
    pub fn hypertension_diabetes() -> Self {
        Self::new("hypertension/diabetes", HYPERTENSION_DIABETES_KEYWORDS)
    }

    #[must_use]
    pub fn ultrasound() -> Self {
        Self::new("ultrasound", ULTRASOUND_KEYWORDS)
    }

    #[must_use]
    pub fn ct() -> Self {
        Self::new("CT", CT_KEYWORDS)
    }

    #[must_use]
    pub fn target_procedures() -> Self {
        Self::new("target procedures", TARGET_PROCEDURE_KEYWORDS)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Compile to a predicate over `column`; an empty set matches nothing
    #[must_use]
    pub fn to_expr(&self, column: &str) -> Expr {
        Expr::Or(
            self.keywords
                .iter()
                .map(|k| contains_filter(column, k))
                .collect(),
        )
    }
}
