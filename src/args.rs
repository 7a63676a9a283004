//! Block arguments.
//!
//! `BlockArgs` is the persisted configuration of one block instance. Every
//! field has a default so partially filled JSON (as written by older UI
//! versions) still loads.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BlockResult, ValidationError};
use crate::label::{default_block_label, LabelParams};
use crate::reference::PlRef;

/// Sequence similarity measure used when clustering paratopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityType {
    /// Raw alignment score.
    #[default]
    AlignmentScore,
    /// Exact sequence identity.
    SequenceIdentity,
    /// BLOSUM40 substitution matrix.
    Blosum40,
    /// BLOSUM50 substitution matrix.
    Blosum50,
    /// BLOSUM62 substitution matrix.
    Blosum62,
    /// BLOSUM80 substitution matrix.
    Blosum80,
    /// BLOSUM90 substitution matrix.
    Blosum90,
}

impl SimilarityType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlignmentScore => "alignment-score",
            Self::SequenceIdentity => "sequence-identity",
            Self::Blosum40 => "blosum40",
            Self::Blosum50 => "blosum50",
            Self::Blosum62 => "blosum62",
            Self::Blosum80 => "blosum80",
            Self::Blosum90 => "blosum90",
        }
    }
}

impl fmt::Display for SimilarityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest supported coverage mode.
pub const MAX_COVERAGE_MODE: u8 = 5;

/// Arguments of the paratope clustering block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockArgs {
    /// Subtitle derived from the parameters.
    pub default_block_label: String,
    /// User supplied subtitle; overrides the default when non-empty.
    pub custom_block_label: String,
    /// Selected input dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_ref: Option<PlRef>,
    /// Per-residue paratope probability cutoff.
    pub paratope_threshold: f64,
    /// Minimum sequence identity inside a cluster.
    pub identity: f64,
    /// Similarity measure.
    pub similarity_type: SimilarityType,
    /// Minimum alignment coverage.
    pub coverage_threshold: f64,
    /// Coverage mode (0..=5), as understood by the clustering tool.
    pub coverage_mode: u8,
    /// Memory limit in GiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<u32>,
    /// CPU limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
}

impl Default for BlockArgs {
    fn default() -> Self {
        Self {
            default_block_label: default_block_label(&LabelParams::default()),
            custom_block_label: String::new(),
            dataset_ref: None,
            paratope_threshold: 0.5,
            identity: 0.8,
            similarity_type: SimilarityType::AlignmentScore,
            coverage_threshold: 0.9,
            coverage_mode: 0,
            mem: None,
            cpu: None,
        }
    }
}

fn validate_fraction(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

fn validate_resource(field: &'static str, value: Option<u32>) -> Result<(), ValidationError> {
    match value {
        Some(0) => Err(ValidationError::NonPositiveResource {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

impl BlockArgs {
    /// Parses and validates arguments from JSON.
    ///
    /// # Errors
    /// - `Parse` for malformed JSON
    /// - any error from [`BlockArgs::validate`]
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let args: Self = serde_json::from_str(json).map_err(|e| ValidationError::Parse {
            message: e.to_string(),
        })?;
        args.validate()?;
        Ok(args)
    }

    /// Loads and validates arguments from a JSON file.
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `Validation` for malformed or out-of-range arguments
    pub fn load(path: impl AsRef<Path>) -> BlockResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// Checks ranges of numeric parameters.
    ///
    /// # Errors
    /// The first offending field, in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fraction("paratopeThreshold", self.paratope_threshold)?;
        validate_fraction("identity", self.identity)?;
        validate_fraction("coverageThreshold", self.coverage_threshold)?;
        if self.coverage_mode > MAX_COVERAGE_MODE {
            return Err(ValidationError::InvalidCoverageMode {
                value: self.coverage_mode,
            });
        }
        validate_resource("mem", self.mem)?;
        validate_resource("cpu", self.cpu)?;
        Ok(())
    }

    /// The block may run once a dataset is selected.
    #[must_use]
    pub fn args_valid(&self) -> bool {
        self.dataset_ref.is_some()
    }

    /// Recomputes `default_block_label` from the current parameters.
    pub fn sync_default_label(&mut self) {
        self.default_block_label = default_block_label(&LabelParams::from(&*self));
    }

    /// Subtitle shown for the block.
    #[must_use]
    pub fn subtitle(&self) -> &str {
        if self.custom_block_label.is_empty() {
            &self.default_block_label
        } else {
            &self.custom_block_label
        }
    }
}
