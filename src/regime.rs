//! Bulk vs single-cell classification.
//!
//! The regime of a dataset is read off the second axis of its anchor column:
//! bulk clone tables are keyed by `clonotypeKey`, single-cell tables by
//! `scClonotypeKey`. Nothing else about the spec is consulted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::ColumnSpec;
use crate::error::CatalogError;
use crate::reference::PlRef;
use crate::resolver::ResolverConfig;

/// Axis position holding the clonotype grouping key.
pub const GROUPING_AXIS_IDX: usize = 1;

/// Dataset regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Bulk repertoire; clones grouped by `clonotypeKey`.
    Bulk,
    /// Single-cell repertoire; clones grouped by `scClonotypeKey`.
    SingleCell,
}

impl Regime {
    /// Classifies an anchor spec.
    ///
    /// Any grouping axis other than the configured single-cell key is bulk,
    /// unless `config.strict_regime` is set, in which case it must equal the
    /// bulk key.
    ///
    /// # Errors
    /// - `MalformedSpec` if the spec has no grouping axis
    /// - `UnrecognisedRegime` in strict mode for an unexpected axis name
    pub fn detect(
        reference: &PlRef,
        spec: &ColumnSpec,
        config: &ResolverConfig,
    ) -> Result<Self, CatalogError> {
        let axis = spec.axis(GROUPING_AXIS_IDX).ok_or_else(|| {
            CatalogError::malformed(
                reference,
                format!(
                    "expected at least {} axes, found {}",
                    GROUPING_AXIS_IDX + 1,
                    spec.axes_spec.len()
                ),
            )
        })?;

        if axis.name == config.single_cell_key {
            return Ok(Self::SingleCell);
        }
        if config.strict_regime && axis.name != config.bulk_key {
            return Err(CatalogError::UnrecognisedRegime {
                reference: reference.to_string(),
                axis: axis.name.clone(),
            });
        }
        Ok(Self::Bulk)
    }

    /// Returns true for [`Regime::SingleCell`].
    #[must_use]
    pub const fn is_single_cell(self) -> bool {
        matches!(self, Self::SingleCell)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulk => write!(f, "bulk"),
            Self::SingleCell => write!(f, "single_cell"),
        }
    }
}
