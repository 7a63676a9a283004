//! Error types for the paratope block.
//!
//! Normal absence (no dataset selected, unknown anchor, missing feature
//! columns) is never an error: it is reported through [`crate::Tristate`].
//! The types here cover genuine faults only: malformed catalog content,
//! malformed queries, backend failures, and invalid block arguments.

use thiserror::Error;

use crate::reference::PlRef;

/// Validation errors for block arguments.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Field '{field}' must be a finite number")]
    NotFinite {
        field: String,
    },

    #[error("Coverage mode {value} is not supported (expected 0..=5)")]
    InvalidCoverageMode {
        value: u8,
    },

    #[error("Resource field '{field}' must be positive")]
    NonPositiveResource {
        field: String,
    },

    #[error("Failed to parse block arguments: {message}")]
    Parse {
        message: String,
    },
}

/// Catalog faults.
///
/// These are raised by [`crate::catalog::ColumnCatalog`] implementations when
/// a lookup cannot be answered because something is structurally wrong,
/// as opposed to "not found" or "not ready yet".
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Column spec does not have the shape required by the query.
    #[error("Malformed column spec for {reference}: {reason}")]
    MalformedSpec {
        reference: String,
        reason: String,
    },

    /// Matcher references an anchor that is not in the binding.
    #[error("Anchor '{anchor}' is not bound in the query")]
    UnboundAnchor {
        anchor: String,
    },

    /// Matcher references an axis index the anchor does not have.
    #[error("Anchor '{anchor}' has {axes} axes, selector asked for index {idx}")]
    AxisOutOfRange {
        anchor: String,
        idx: usize,
        axes: usize,
    },

    /// Anchor axis[1] names neither the bulk nor the single-cell key.
    #[error("Unrecognised grouping axis '{axis}' on {reference}")]
    UnrecognisedRegime {
        reference: String,
        axis: String,
    },

    /// Key already exists.
    #[error("Duplicate column reference: {0}")]
    DuplicateReference(PlRef),

    /// Backend error.
    #[error("Catalog backend error: {0}")]
    BackendError(String),
}

impl CatalogError {
    /// Creates a malformed-spec error.
    #[must_use]
    pub fn malformed(reference: &PlRef, reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for the block.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlockError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a catalog error.
    #[must_use]
    pub const fn is_catalog(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }

    /// Returns true if re-evaluating against a newer catalog snapshot may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Catalog(e) => matches!(e, CatalogError::BackendError(_)),
            Self::Io(_) => true,
            Self::Validation(_) => false,
        }
    }
}

/// Result type alias for block operations.
pub type BlockResult<T> = Result<T, BlockError>;
