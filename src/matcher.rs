//! Column matchers for anchored catalog queries.
//!
//! A [`ColumnMatcher`] describes the columns a query wants: axis selectors
//! (usually resolved against an anchor column), a column name, and domain
//! constraints. A query with several matchers is satisfied by any of them;
//! every constraint inside one matcher must hold.
//!
//! Matchers for required features are produced by [`build_matchers`] from a
//! fixed constraint table, so the per-regime shape lives in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::{names, AxisSpec, ColumnSpec, Tags};
use crate::error::CatalogError;
use crate::feature::Feature;
use crate::reference::MAIN_ANCHOR;
use crate::regime::{Regime, GROUPING_AXIS_IDX};

/// Selects one axis of a candidate column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSelector {
    /// Axis `idx` of the anchor bound under `anchor`.
    Anchored {
        /// Anchor name in the binding.
        anchor: String,
        /// Axis index inside the anchor spec.
        idx: usize,
    },
    /// Any axis with this name.
    Named {
        /// Axis name.
        name: String,
    },
}

impl AxisSelector {
    /// Axis `idx` of the main anchor.
    #[must_use]
    pub fn main(idx: usize) -> Self {
        Self::Anchored {
            anchor: MAIN_ANCHOR.to_string(),
            idx,
        }
    }
}

/// Axis selector after anchor resolution.
enum ResolvedAxis<'a> {
    Axis(&'a AxisSpec),
    Name(&'a str),
}

impl ResolvedAxis<'_> {
    fn accepts(&self, axis: &AxisSpec) -> bool {
        match self {
            Self::Axis(expected) => expected.same_key_space(axis),
            Self::Name(name) => axis.name == *name,
        }
    }
}

/// Constraint set for one kind of column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMatcher {
    /// Axis selectors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<AxisSelector>,
    /// Required column name.
    pub name: String,
    /// Required domain tags (equality).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain: Tags,
    /// When false the candidate must have exactly the selected axes, in order.
    #[serde(default)]
    pub partial_axes_match: bool,
}

impl ColumnMatcher {
    /// Creates a matcher for columns named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            axes: Vec::new(),
            name: name.into(),
            domain: Tags::new(),
            partial_axes_match: false,
        }
    }

    /// Appends an axis selector.
    #[must_use]
    pub fn with_axis(mut self, axis: AxisSelector) -> Self {
        self.axes.push(axis);
        self
    }

    /// Adds a domain constraint.
    #[must_use]
    pub fn with_domain(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.domain.insert(key.into(), value.into());
        self
    }

    /// Accepts candidates that carry the selected axes anywhere among others.
    #[must_use]
    pub fn partial(mut self) -> Self {
        self.partial_axes_match = true;
        self
    }

    /// Tests a candidate column against this matcher.
    ///
    /// `anchors` maps anchor names to the specs they are bound to.
    ///
    /// # Errors
    /// - `UnboundAnchor` if a selector names an anchor missing from `anchors`
    /// - `AxisOutOfRange` if a selector indexes past the anchor's axes
    pub fn matches(
        &self,
        candidate: &ColumnSpec,
        anchors: &BTreeMap<String, ColumnSpec>,
    ) -> Result<bool, CatalogError> {
        let selectors = self
            .axes
            .iter()
            .map(|sel| resolve_selector(sel, anchors))
            .collect::<Result<Vec<_>, _>>()?;

        if candidate.name != self.name {
            return Ok(false);
        }
        let domain_ok = self
            .domain
            .iter()
            .all(|(k, v)| candidate.domain_value(k) == Some(v.as_str()));
        if !domain_ok {
            return Ok(false);
        }

        let axes = &candidate.axes_spec;
        let axes_ok = if self.partial_axes_match {
            selectors.iter().all(|sel| axes.iter().any(|a| sel.accepts(a)))
        } else {
            axes.len() == selectors.len()
                && selectors.iter().zip(axes).all(|(sel, a)| sel.accepts(a))
        };
        Ok(axes_ok)
    }
}

fn resolve_selector<'a>(
    selector: &'a AxisSelector,
    anchors: &'a BTreeMap<String, ColumnSpec>,
) -> Result<ResolvedAxis<'a>, CatalogError> {
    match selector {
        AxisSelector::Named { name } => Ok(ResolvedAxis::Name(name)),
        AxisSelector::Anchored { anchor, idx } => {
            let spec = anchors.get(anchor).ok_or_else(|| CatalogError::UnboundAnchor {
                anchor: anchor.clone(),
            })?;
            spec.axis(*idx)
                .map(ResolvedAxis::Axis)
                .ok_or_else(|| CatalogError::AxisOutOfRange {
                    anchor: anchor.clone(),
                    idx: *idx,
                    axes: spec.axes_spec.len(),
                })
        }
    }
}

/// Domain constraints shared by every required-feature matcher.
const FEATURE_DOMAIN: &[(&str, &str)] = &[(names::DOMAIN_ALPHABET, names::ALPHABET_AMINO_ACID)];

/// Extra domain constraints per regime.
const REGIME_DOMAIN: &[(Regime, &[(&str, &str)])] = &[
    (Regime::Bulk, &[]),
    (Regime::SingleCell, &[(names::DOMAIN_CHAIN_INDEX, names::CHAIN_PRIMARY)]),
];

fn regime_domain(regime: Regime) -> &'static [(&'static str, &'static str)] {
    for (r, tags) in REGIME_DOMAIN {
        if *r == regime {
            return *tags;
        }
    }
    &[]
}

/// Matchers for one feature check, all of a single regime's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherSet {
    regime: Regime,
    matchers: Vec<ColumnMatcher>,
}

impl MatcherSet {
    /// Regime whose shape every matcher in the set follows.
    #[must_use]
    pub const fn regime(&self) -> Regime {
        self.regime
    }

    /// The matchers, to be OR-ed by the catalog.
    #[must_use]
    pub fn as_slice(&self) -> &[ColumnMatcher] {
        &self.matchers
    }
}

/// Builds the regime-appropriate matchers for a required feature.
///
/// Sequence columns are keyed by the anchor's grouping axis alone and must be
/// amino-acid. Single-cell datasets carry one column per chain, so the
/// primary chain is pinned.
#[must_use]
pub fn build_matchers(feature: Feature, regime: Regime) -> MatcherSet {
    let mut matcher = ColumnMatcher::new(names::COLUMN_SEQUENCE)
        .with_axis(AxisSelector::main(GROUPING_AXIS_IDX))
        .with_domain(names::DOMAIN_FEATURE, feature.as_str());
    for (k, v) in FEATURE_DOMAIN.iter().chain(regime_domain(regime)) {
        matcher = matcher.with_domain(*k, *v);
    }
    MatcherSet {
        regime,
        matchers: vec![matcher],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(grouping: &str) -> BTreeMap<String, ColumnSpec> {
        let spec = ColumnSpec::new("pl7.app/vdj/readCount", "Long")
            .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID))
            .with_axis(AxisSpec::new(grouping));
        BTreeMap::from([(MAIN_ANCHOR.to_string(), spec)])
    }

    fn sequence(grouping: &str, feature: &str) -> ColumnSpec {
        ColumnSpec::new(names::COLUMN_SEQUENCE, "String")
            .with_axis(AxisSpec::new(grouping))
            .with_domain(names::DOMAIN_FEATURE, feature)
            .with_domain(names::DOMAIN_ALPHABET, names::ALPHABET_AMINO_ACID)
    }

    #[test]
    fn test_bulk_matcher_shape() {
        let set = build_matchers(Feature::Cdr3, Regime::Bulk);
        assert_eq!(set.regime(), Regime::Bulk);
        let [m] = set.as_slice() else { panic!("expected one matcher") };
        assert_eq!(m.name, names::COLUMN_SEQUENCE);
        assert_eq!(m.axes, vec![AxisSelector::main(1)]);
        assert_eq!(m.domain.get(names::DOMAIN_FEATURE).map(String::as_str), Some("CDR3"));
        assert_eq!(m.domain.get(names::DOMAIN_ALPHABET).map(String::as_str), Some("aminoacid"));
        assert!(!m.domain.contains_key(names::DOMAIN_CHAIN_INDEX));
    }

    #[test]
    fn test_single_cell_matcher_pins_primary_chain() {
        let set = build_matchers(Feature::Fr4InFrame, Regime::SingleCell);
        assert_eq!(set.regime(), Regime::SingleCell);
        for m in set.as_slice() {
            assert_eq!(m.domain.get(names::DOMAIN_CHAIN_INDEX).map(String::as_str), Some("primary"));
            assert_eq!(m.domain.get(names::DOMAIN_FEATURE).map(String::as_str), Some("FR4InFrame"));
            assert_eq!(m.domain.len(), 3);
        }
    }

    #[test]
    fn test_matcher_serializes_platform_shape() {
        let set = build_matchers(Feature::Cdr1, Regime::Bulk);
        let json = serde_json::to_value(&set.as_slice()[0]).unwrap();
        assert_eq!(json["axes"][0], serde_json::json!({ "anchor": "main", "idx": 1 }));
        assert_eq!(json["name"], "pl7.app/vdj/sequence");
        assert_eq!(json["partialAxesMatch"], false);
    }

    #[test]
    fn test_matches_bulk_sequence_column() {
        let m = build_matchers(Feature::Cdr3, Regime::Bulk).as_slice()[0].clone();
        let anchors = anchors(names::AXIS_CLONOTYPE_KEY);
        assert!(m.matches(&sequence(names::AXIS_CLONOTYPE_KEY, "CDR3"), &anchors).unwrap());
        assert!(!m.matches(&sequence(names::AXIS_CLONOTYPE_KEY, "CDR2"), &anchors).unwrap());
        assert!(!m.matches(&sequence(names::AXIS_SC_CLONOTYPE_KEY, "CDR3"), &anchors).unwrap());
    }

    #[test]
    fn test_nucleotide_column_does_not_match() {
        let m = build_matchers(Feature::Cdr3, Regime::Bulk).as_slice()[0].clone();
        let nt = sequence(names::AXIS_CLONOTYPE_KEY, "CDR3")
            .with_domain(names::DOMAIN_ALPHABET, "nucleotide");
        assert!(!m.matches(&nt, &anchors(names::AXIS_CLONOTYPE_KEY)).unwrap());
    }

    #[test]
    fn test_single_cell_requires_chain_tag() {
        let m = build_matchers(Feature::Cdr3, Regime::SingleCell).as_slice()[0].clone();
        let anchors = anchors(names::AXIS_SC_CLONOTYPE_KEY);
        let untagged = sequence(names::AXIS_SC_CLONOTYPE_KEY, "CDR3");
        assert!(!m.matches(&untagged, &anchors).unwrap());
        let secondary = untagged.clone().with_domain(names::DOMAIN_CHAIN_INDEX, "secondary");
        assert!(!m.matches(&secondary, &anchors).unwrap());
        let primary = untagged.with_domain(names::DOMAIN_CHAIN_INDEX, "primary");
        assert!(m.matches(&primary, &anchors).unwrap());
    }

    #[test]
    fn test_exact_axes_vs_partial() {
        let wide = sequence(names::AXIS_CLONOTYPE_KEY, "CDR3")
            .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID));
        let anchors = anchors(names::AXIS_CLONOTYPE_KEY);
        let exact = build_matchers(Feature::Cdr3, Regime::Bulk).as_slice()[0].clone();
        assert!(!exact.matches(&wide, &anchors).unwrap());
        assert!(exact.partial().matches(&wide, &anchors).unwrap());
    }

    #[test]
    fn test_anchor_axis_domain_must_agree() {
        let mut anchors = anchors(names::AXIS_CLONOTYPE_KEY);
        if let Some(spec) = anchors.get_mut(MAIN_ANCHOR) {
            spec.axes_spec[1].domain.insert("pl7.app/blockId".to_string(), "b1".to_string());
        }
        let m = build_matchers(Feature::Cdr3, Regime::Bulk).as_slice()[0].clone();
        assert!(!m.matches(&sequence(names::AXIS_CLONOTYPE_KEY, "CDR3"), &anchors).unwrap());
    }

    #[test]
    fn test_unbound_anchor_is_an_error() {
        let m = ColumnMatcher::new(names::COLUMN_SEQUENCE).with_axis(AxisSelector::Anchored {
            anchor: "other".to_string(),
            idx: 0,
        });
        let err = m
            .matches(&sequence(names::AXIS_CLONOTYPE_KEY, "CDR3"), &anchors(names::AXIS_CLONOTYPE_KEY))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnboundAnchor { .. }));
    }

    #[test]
    fn test_axis_out_of_range_is_an_error() {
        let m = ColumnMatcher::new(names::COLUMN_SEQUENCE).with_axis(AxisSelector::main(5));
        let err = m
            .matches(&sequence(names::AXIS_CLONOTYPE_KEY, "CDR3"), &anchors(names::AXIS_CLONOTYPE_KEY))
            .unwrap_err();
        assert!(matches!(err, CatalogError::AxisOutOfRange { idx: 5, axes: 2, .. }));
    }

    #[test]
    fn test_named_selector() {
        let m = ColumnMatcher::new(names::COLUMN_SEQUENCE).with_axis(AxisSelector::Named {
            name: names::AXIS_CLONOTYPE_KEY.to_string(),
        });
        let json = serde_json::to_value(&m.axes[0]).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "pl7.app/vdj/clonotypeKey" }));
        assert!(m.matches(&sequence(names::AXIS_CLONOTYPE_KEY, "FR1"), &BTreeMap::new()).unwrap());
    }
}
