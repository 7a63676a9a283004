//! # paratope-block - Paratope clustering block model
//!
//! Model side of the paratope clustering block: block arguments, the
//! catalog-derived outputs, and the anchored feature-column resolver that
//! decides whether a selected VDJ dataset can be clustered.
//!
//! ## Core Concepts
//!
//! - **Anchor**: the dataset column the user selected ([`PlRef`])
//! - **Regime**: bulk or single-cell, read from the anchor's grouping axis
//! - **Matcher**: constraints used to find feature columns keyed like the anchor
//! - **Tristate**: `Unknown | No | Yes`, keeping "not yet applicable" apart from "missing"
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paratope_block::{FeatureResolver, InMemoryCatalog, PlRef, Tristate};
//!
//! let catalog = InMemoryCatalog::new();
//! // ... register upstream columns ...
//! let anchor = PlRef::new("mixcr-1", "clones");
//! let res = FeatureResolver::new(&catalog).resolve(Some(&anchor));
//! if res.has_required_columns == Tristate::No {
//!     // tell the user which dataset to pick instead
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod block;
pub mod catalog;
pub mod column;
pub mod error;
pub mod feature;
pub mod label;
pub mod matcher;
pub mod options;
pub mod reference;
pub mod regime;
pub mod resolver;
pub mod tristate;

// Re-export primary types at crate root for convenience
pub use args::{BlockArgs, SimilarityType};
pub use block::{BlockModel, BlockOutputs};
pub use catalog::{ColumnCatalog, InMemoryCatalog};
pub use column::{linker_column_id, names, AxisSpec, ColumnId, ColumnSpec, PColumn};
pub use error::{BlockError, BlockResult, CatalogError, ValidationError};
pub use feature::{Feature, RequirementSlot, REQUIRED_FEATURES};
pub use label::{default_block_label, LabelParams, BLOCK_TITLE};
pub use matcher::{build_matchers, AxisSelector, ColumnMatcher, MatcherSet};
pub use options::{dataset_options, DatasetOption};
pub use reference::{AnchorBinding, PlRef, MAIN_ANCHOR};
pub use regime::Regime;
pub use resolver::{resolve, FeatureResolver, Resolution, ResolverConfig};
pub use tristate::Tristate;
