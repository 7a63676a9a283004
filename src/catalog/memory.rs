//! In-memory catalog backend.
//!
//! Thread-safe, snapshot-consistent per call. Columns are registered under
//! the reference that exports them; a reference can also be registered as
//! pending, meaning the upstream block has announced it but its spec is not
//! materialised yet.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use tracing::trace;

use crate::catalog::traits::ColumnCatalog;
use crate::column::{names, ColumnId, ColumnSpec, PColumn};
use crate::error::CatalogError;
use crate::matcher::ColumnMatcher;
use crate::reference::{AnchorBinding, PlRef};

fn lock_err(context: &'static str) -> CatalogError {
    CatalogError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct CatalogState {
    columns: BTreeMap<ColumnId, PColumn>,
    by_ref: HashMap<PlRef, ColumnId>,
    pending: HashSet<PlRef>,
}

/// Thread-safe in-memory catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a materialised column. Clears a pending mark for the same
    /// reference.
    ///
    /// # Errors
    /// - `DuplicateReference` if the reference already has a spec
    pub fn insert(&self, reference: PlRef, spec: ColumnSpec) -> Result<ColumnId, CatalogError> {
        let mut state = self.state.write().map_err(|_| lock_err("catalog.insert"))?;
        if state.by_ref.contains_key(&reference) {
            return Err(CatalogError::DuplicateReference(reference));
        }
        let id = ColumnId::for_ref(&reference);
        state.pending.remove(&reference);
        state.by_ref.insert(reference, id);
        state.columns.insert(id, PColumn { id, spec });
        Ok(id)
    }

    /// Marks a reference as announced but not yet materialised.
    ///
    /// # Errors
    /// - `DuplicateReference` if the reference already has a spec
    pub fn mark_pending(&self, reference: PlRef) -> Result<(), CatalogError> {
        let mut state = self.state.write().map_err(|_| lock_err("catalog.mark_pending"))?;
        if state.by_ref.contains_key(&reference) {
            return Err(CatalogError::DuplicateReference(reference));
        }
        state.pending.insert(reference);
        Ok(())
    }

    /// Removes a column (or a pending mark). Returns the removed spec.
    ///
    /// # Errors
    /// - `BackendError` if the catalog lock is poisoned
    pub fn remove(&self, reference: &PlRef) -> Result<Option<ColumnSpec>, CatalogError> {
        let mut state = self.state.write().map_err(|_| lock_err("catalog.remove"))?;
        state.pending.remove(reference);
        let Some(id) = state.by_ref.remove(reference) else {
            return Ok(None);
        };
        Ok(state.columns.remove(&id).map(|c| c.spec))
    }

    /// Number of materialised columns.
    ///
    /// # Errors
    /// - `BackendError` if the catalog lock is poisoned
    pub fn len(&self) -> Result<usize, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.len"))?;
        Ok(state.columns.len())
    }

    /// Returns true if no column is materialised.
    ///
    /// # Errors
    /// - `BackendError` if the catalog lock is poisoned
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }
}

impl ColumnCatalog for InMemoryCatalog {
    fn column_spec(&self, reference: &PlRef) -> Result<Option<ColumnSpec>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.column_spec"))?;
        Ok(state
            .by_ref
            .get(reference)
            .and_then(|id| state.columns.get(id))
            .map(|c| c.spec.clone()))
    }

    fn matching_columns(
        &self,
        anchors: &AnchorBinding,
        matchers: &[ColumnMatcher],
    ) -> Result<Option<Vec<PColumn>>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.matching_columns"))?;

        let mut resolved = BTreeMap::new();
        for (name, reference) in anchors.iter() {
            let spec = state.by_ref.get(reference).and_then(|id| state.columns.get(id));
            let Some(column) = spec else {
                trace!(anchor = name, reference = %reference, "catalog: anchor not resolvable");
                return Ok(None);
            };
            resolved.insert(name.to_string(), column.spec.clone());
        }

        let mut out = Vec::new();
        for column in state.columns.values() {
            for matcher in matchers {
                if matcher.matches(&column.spec, &resolved)? {
                    out.push(column.clone());
                    break;
                }
            }
        }

        trace!(matchers = matchers.len(), hits = out.len(), "catalog: anchored query");
        Ok(Some(out))
    }

    fn anchor_columns(&self) -> Result<Vec<(PlRef, ColumnSpec)>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.anchor_columns"))?;
        let mut out: Vec<(PlRef, ColumnSpec)> = state
            .by_ref
            .iter()
            .filter_map(|(reference, id)| {
                let column = state.columns.get(id)?;
                column
                    .spec
                    .has_flag(names::ANNOTATION_IS_ANCHOR)
                    .then(|| (reference.clone(), column.spec.clone()))
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}
