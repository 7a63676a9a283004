//! Input dataset options.
//!
//! The dataset selector lists clone tables that upstream blocks marked as
//! anchors and that are keyed by sample and clonotype, bulk or single-cell.

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnCatalog;
use crate::column::{names, ColumnSpec};
use crate::error::CatalogError;
use crate::reference::PlRef;

/// Axis layouts accepted as input datasets.
pub const DATASET_AXES: &[&[&str]] = &[
    &[names::AXIS_SAMPLE_ID, names::AXIS_CLONOTYPE_KEY],
    &[names::AXIS_SAMPLE_ID, names::AXIS_SC_CLONOTYPE_KEY],
];

/// One entry of the dataset selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOption {
    /// Reference stored in `datasetRef` when picked.
    #[serde(rename = "ref")]
    pub reference: PlRef,
    /// Display label.
    pub label: String,
}

/// True if `spec` is an anchor column with one of the accepted axis layouts.
#[must_use]
pub fn is_dataset_candidate(spec: &ColumnSpec) -> bool {
    if !spec.has_flag(names::ANNOTATION_IS_ANCHOR) {
        return false;
    }
    DATASET_AXES.iter().any(|layout| {
        layout.len() == spec.axes_spec.len()
            && layout.iter().zip(&spec.axes_spec).all(|(name, axis)| axis.name == *name)
    })
}

/// Lists selectable datasets, ordered by reference.
///
/// # Errors
/// Propagates catalog faults.
pub fn dataset_options<C: ColumnCatalog + ?Sized>(
    catalog: &C,
) -> Result<Vec<DatasetOption>, CatalogError> {
    let mut options: Vec<DatasetOption> = catalog
        .anchor_columns()?
        .into_iter()
        .filter(|(_, spec)| is_dataset_candidate(spec))
        .map(|(reference, spec)| DatasetOption {
            label: spec.label().to_string(),
            reference,
        })
        .collect();
    options.sort_by(|a, b| a.reference.cmp(&b.reference));
    Ok(options)
}
