//! Abstract catalog trait.

use crate::column::{ColumnSpec, PColumn};
use crate::error::CatalogError;
use crate::matcher::ColumnMatcher;
use crate::reference::{AnchorBinding, PlRef};

/// Read-only view of the platform result catalog.
///
/// All methods are snapshot reads and must not block. "Not known" and "not
/// ready yet" are `Ok(None)`; `Err` is reserved for malformed content or a
/// failing backend.
pub trait ColumnCatalog: Send + Sync {
    /// Spec of the column behind `reference`.
    ///
    /// Returns `Ok(None)` for stale or not yet materialised references.
    fn column_spec(&self, reference: &PlRef) -> Result<Option<ColumnSpec>, CatalogError>;

    /// Columns matching any of `matchers`, with anchored selectors resolved
    /// against `anchors`.
    ///
    /// Returns `Ok(None)` when a bound anchor cannot be resolved yet and
    /// `Ok(Some(vec![]))` when the query is answerable but nothing matches.
    ///
    /// # Errors
    /// - `UnboundAnchor` / `AxisOutOfRange` for selectors that do not fit the binding
    fn matching_columns(
        &self,
        anchors: &AnchorBinding,
        matchers: &[ColumnMatcher],
    ) -> Result<Option<Vec<PColumn>>, CatalogError>;

    /// Columns annotated as selectable input datasets.
    fn anchor_columns(&self) -> Result<Vec<(PlRef, ColumnSpec)>, CatalogError>;
}
