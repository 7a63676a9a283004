//! Default block subtitle.

use crate::args::{BlockArgs, SimilarityType};

/// Block title.
pub const BLOCK_TITLE: &str = "Paratope Clustering";

/// Similarity measure offered in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityOption {
    /// Display label.
    pub label: &'static str,
    /// Wire value.
    pub value: SimilarityType,
}

/// Options listed in the similarity selector, in display order.
pub const SIMILARITY_TYPE_OPTIONS: &[SimilarityOption] = &[
    SimilarityOption { label: "Exact Match", value: SimilarityType::SequenceIdentity },
    SimilarityOption { label: "BLOSUM40", value: SimilarityType::Blosum40 },
    SimilarityOption { label: "BLOSUM50", value: SimilarityType::Blosum50 },
    SimilarityOption { label: "BLOSUM62", value: SimilarityType::Blosum62 },
    SimilarityOption { label: "BLOSUM80", value: SimilarityType::Blosum80 },
    SimilarityOption { label: "BLOSUM90", value: SimilarityType::Blosum90 },
];

/// Label used for similarity types with no selector entry.
const FALLBACK_SIMILARITY_LABEL: &str = "BLOSUM62";

const DEFAULT_PARATOPE_THRESHOLD: f64 = 0.5;

/// Inputs of [`default_block_label`]. Unset parts are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelParams {
    /// Paratope cutoff; rendered as 0.5 when unset.
    pub paratope_threshold: Option<f64>,
    /// Similarity measure.
    pub similarity_type: Option<SimilarityType>,
    /// Identity threshold.
    pub identity: Option<f64>,
    /// Coverage threshold.
    pub coverage_threshold: Option<f64>,
}

impl From<&BlockArgs> for LabelParams {
    fn from(args: &BlockArgs) -> Self {
        Self {
            paratope_threshold: Some(args.paratope_threshold),
            similarity_type: Some(args.similarity_type),
            identity: Some(args.identity),
            coverage_threshold: Some(args.coverage_threshold),
        }
    }
}

/// Display label of a similarity type.
#[must_use]
pub fn similarity_label(similarity: SimilarityType) -> &'static str {
    SIMILARITY_TYPE_OPTIONS
        .iter()
        .find(|o| o.value == similarity)
        .map_or(FALLBACK_SIMILARITY_LABEL, |o| o.label)
}

/// Builds the subtitle, e.g. `"Paratope 0.5, BLOSUM62, ident:0.8, cov:0.9"`.
#[must_use]
pub fn default_block_label(params: &LabelParams) -> String {
    let mut parts = vec![format!(
        "Paratope {}",
        params.paratope_threshold.unwrap_or(DEFAULT_PARATOPE_THRESHOLD)
    )];
    if let Some(similarity) = params.similarity_type {
        parts.push(similarity_label(similarity).to_string());
    }
    if let Some(identity) = params.identity {
        parts.push(format!("ident:{identity}"));
    }
    if let Some(coverage) = params.coverage_threshold {
        parts.push(format!("cov:{coverage}"));
    }
    parts.join(", ")
}
