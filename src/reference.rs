//! Dataset anchor references.
//!
//! A [`PlRef`] names one column exported by an upstream block. It is the
//! value the user picks in the dataset selector and the only handle the
//! block holds on its input.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a column exported by another block.
///
/// # Examples
///
/// ```
/// use paratope_block::PlRef;
///
/// let r = PlRef::new("mixcr-1", "clones");
/// assert_eq!(r.to_string(), "mixcr-1/clones");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlRef {
    /// Id of the block exporting the column.
    pub block_id: String,
    /// Export name inside that block.
    pub name: String,
}

impl PlRef {
    /// Creates a new reference.
    #[must_use]
    pub fn new(block_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.block_id, self.name)
    }
}

/// Name under which the selected dataset is bound in anchored queries.
pub const MAIN_ANCHOR: &str = "main";

/// Named anchors for an anchored column query (`{ "main": ref }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorBinding(BTreeMap<String, PlRef>);

impl AnchorBinding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `reference` under [`MAIN_ANCHOR`].
    #[must_use]
    pub fn main(reference: PlRef) -> Self {
        Self::new().with(MAIN_ANCHOR, reference)
    }

    /// Adds a named anchor.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, reference: PlRef) -> Self {
        self.0.insert(name.into(), reference);
        self
    }

    /// Looks up an anchor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PlRef> {
        self.0.get(name)
    }

    /// Iterates over `(name, reference)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlRef)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
