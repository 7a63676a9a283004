//! Column metadata as published in the result catalog.
//!
//! A column is described by its [`ColumnSpec`]: an ordered list of axes plus
//! free-form domain tags and annotations. Domain tags restrict the meaning of
//! a column (feature, alphabet, chain) and take part in matching; annotations
//! are presentation hints (labels, anchor markers).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reference::PlRef;

/// Well-known axis, column, domain and annotation names.
pub mod names {
    /// Sample identifier axis.
    pub const AXIS_SAMPLE_ID: &str = "pl7.app/sampleId";
    /// Bulk clonotype grouping key.
    pub const AXIS_CLONOTYPE_KEY: &str = "pl7.app/vdj/clonotypeKey";
    /// Single-cell clonotype grouping key.
    pub const AXIS_SC_CLONOTYPE_KEY: &str = "pl7.app/vdj/scClonotypeKey";

    /// Sequence column name.
    pub const COLUMN_SEQUENCE: &str = "pl7.app/vdj/sequence";

    /// Domain tag holding the region / feature name.
    pub const DOMAIN_FEATURE: &str = "pl7.app/vdj/feature";
    /// Domain tag holding the single-cell chain index.
    pub const DOMAIN_CHAIN_INDEX: &str = "pl7.app/vdj/scClonotypeChain/index";
    /// Domain tag holding the sequence alphabet.
    pub const DOMAIN_ALPHABET: &str = "pl7.app/alphabet";

    /// Amino-acid alphabet value.
    pub const ALPHABET_AMINO_ACID: &str = "aminoacid";
    /// Primary chain value.
    pub const CHAIN_PRIMARY: &str = "primary";

    /// Marks a column as selectable input dataset.
    pub const ANNOTATION_IS_ANCHOR: &str = "pl7.app/isAnchor";
    /// Human readable label.
    pub const ANNOTATION_LABEL: &str = "pl7.app/label";
    /// Marks the linker column among MSA outputs.
    pub const ANNOTATION_IS_LINKER: &str = "pl7.app/isLinkerColumn";
}

/// Key/value metadata map. Ordered so that serialisation is stable.
pub type Tags = BTreeMap<String, String>;

/// Stable identifier of a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(Uuid);

impl ColumnId {
    /// Creates a new random column ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the column ID for an exported reference.
    ///
    /// The same reference always yields the same ID.
    #[must_use]
    pub fn for_ref(reference: &PlRef) -> Self {
        let key = format!("plref:{}\u{0}{}", reference.block_id, reference.name);
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One dimension of a column's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Semantic axis name, e.g. [`names::AXIS_SAMPLE_ID`].
    pub name: String,
    /// Key value type.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Domain tags of the axis.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain: Tags,
    /// Annotations of the axis.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: Tags,
}

impl AxisSpec {
    /// Creates a string-typed axis with no tags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: "String".to_string(),
            domain: Tags::new(),
            annotations: Tags::new(),
        }
    }

    /// Adds a domain tag.
    #[must_use]
    pub fn with_domain(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.domain.insert(key.into(), value.into());
        self
    }

    /// Two axes index the same key space when name and domain agree.
    /// Type and annotations are not part of axis identity.
    #[must_use]
    pub fn same_key_space(&self, other: &Self) -> bool {
        self.name == other.name && self.domain == other.domain
    }
}

/// Full specification of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Column kind; always `PColumn` for catalog columns.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Semantic column name.
    pub name: String,
    /// Value type of the cells.
    pub value_type: String,
    /// Domain tags.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain: Tags,
    /// Annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: Tags,
    /// Ordered axes.
    #[serde(default)]
    pub axes_spec: Vec<AxisSpec>,
}

fn default_kind() -> String {
    "PColumn".to_string()
}

impl ColumnSpec {
    /// Creates a column spec with no axes and no tags.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            kind: default_kind(),
            name: name.into(),
            value_type: value_type.into(),
            domain: Tags::new(),
            annotations: Tags::new(),
            axes_spec: Vec::new(),
        }
    }

    /// Appends an axis.
    #[must_use]
    pub fn with_axis(mut self, axis: AxisSpec) -> Self {
        self.axes_spec.push(axis);
        self
    }

    /// Adds a domain tag.
    #[must_use]
    pub fn with_domain(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.domain.insert(key.into(), value.into());
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Returns the axis at `idx`, if present.
    #[must_use]
    pub fn axis(&self, idx: usize) -> Option<&AxisSpec> {
        self.axes_spec.get(idx)
    }

    /// Returns the domain tag value for `key`.
    #[must_use]
    pub fn domain_value(&self, key: &str) -> Option<&str> {
        self.domain.get(key).map(String::as_str)
    }

    /// Returns the annotation value for `key`.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Returns true if the annotation `key` is the string `"true"`.
    #[must_use]
    pub fn has_flag(&self, key: &str) -> bool {
        self.annotation(key) == Some("true")
    }

    /// Human readable label, falling back to the column name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.annotation(names::ANNOTATION_LABEL).unwrap_or(&self.name)
    }
}

/// A column as returned by catalog queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PColumn {
    /// Column identifier.
    pub id: ColumnId,
    /// Column spec.
    pub spec: ColumnSpec,
}

impl PColumn {
    /// Creates a column with a random id.
    #[must_use]
    pub fn new(spec: ColumnSpec) -> Self {
        Self {
            id: ColumnId::new(),
            spec,
        }
    }
}

/// Finds the linker column among MSA output columns.
#[must_use]
pub fn linker_column_id(columns: &[PColumn]) -> Option<ColumnId> {
    columns
        .iter()
        .find(|c| c.spec.has_flag(names::ANNOTATION_IS_LINKER))
        .map(|c| c.id)
}
