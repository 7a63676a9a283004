//! Anchored feature-column resolution.
//!
//! Given the selected dataset, the resolver decides whether it is a
//! single-cell dataset and whether every required amino-acid region column
//! is available to the clustering pipeline.
//!
//! Both answers are three-valued. `Unknown` means "not applicable yet" (no
//! dataset selected, anchor not resolvable, catalog not ready) and is kept
//! apart from a definite `No`. The resolver reads the catalog only, holds
//! no state between calls, and returns the same answer for the same
//! snapshot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::ColumnCatalog;
use crate::column::names;
use crate::error::CatalogError;
use crate::feature::{Feature, RequirementSlot, REQUIRED_FEATURES};
use crate::matcher::build_matchers;
use crate::reference::{AnchorBinding, PlRef};
use crate::regime::Regime;
use crate::tristate::Tristate;

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Grouping axis name identifying single-cell datasets.
    pub single_cell_key: String,
    /// Grouping axis name identifying bulk datasets.
    pub bulk_key: String,
    /// Reject grouping axes that are neither key instead of treating them as bulk.
    pub strict_regime: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            single_cell_key: names::AXIS_SC_CLONOTYPE_KEY.to_string(),
            bulk_key: names::AXIS_CLONOTYPE_KEY.to_string(),
            strict_regime: false,
        }
    }
}

impl ResolverConfig {
    /// Default keys with strict regime detection.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_regime: true,
            ..Self::default()
        }
    }
}

/// Resolver verdict for one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Dataset is single-cell.
    pub is_single_cell: Tristate,
    /// Every required feature column is present.
    pub has_required_columns: Tristate,
}

impl Resolution {
    /// Nothing can be said about the anchor.
    pub const UNKNOWN: Self = Self {
        is_single_cell: Tristate::Unknown,
        has_required_columns: Tristate::Unknown,
    };
}

/// Resolves regime and required columns against a catalog.
#[derive(Debug)]
pub struct FeatureResolver<'a, C: ColumnCatalog + ?Sized> {
    catalog: &'a C,
    config: ResolverConfig,
}

impl<'a, C: ColumnCatalog + ?Sized> FeatureResolver<'a, C> {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn new(catalog: &'a C) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    /// Creates a resolver with an explicit configuration.
    #[must_use]
    pub fn with_config(catalog: &'a C, config: ResolverConfig) -> Self {
        Self { catalog, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves an anchor. Never fails; faults degrade to `Unknown`.
    #[must_use]
    pub fn resolve(&self, anchor: Option<&PlRef>) -> Resolution {
        match self.try_resolve(anchor) {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(anchor = ?anchor.map(ToString::to_string), error = %e, "resolver: anchor fault");
                Resolution::UNKNOWN
            }
        }
    }

    /// Resolves an anchor, surfacing anchor-level faults.
    ///
    /// Faults in individual feature lookups stay isolated to their slot and
    /// are never returned here.
    ///
    /// # Errors
    /// - any catalog error raised while fetching the anchor spec
    /// - `MalformedSpec` if the anchor has no grouping axis
    /// - `UnrecognisedRegime` in strict mode
    pub fn try_resolve(&self, anchor: Option<&PlRef>) -> Result<Resolution, CatalogError> {
        let Some(anchor) = anchor else {
            return Ok(Resolution::UNKNOWN);
        };
        let Some(regime) = self.regime(anchor)? else {
            return Ok(Resolution::UNKNOWN);
        };

        let has_required_columns = self.check_required(anchor, regime);
        debug!(
            anchor = %anchor,
            regime = %regime,
            has_required_columns = %has_required_columns,
            "resolver: resolved"
        );
        Ok(Resolution {
            is_single_cell: Tristate::from_bool(regime.is_single_cell()),
            has_required_columns,
        })
    }

    /// `isSingleCell` output alone.
    #[must_use]
    pub fn is_single_cell(&self, anchor: Option<&PlRef>) -> Tristate {
        let Some(anchor) = anchor else {
            return Tristate::Unknown;
        };
        match self.regime(anchor) {
            Ok(Some(regime)) => Tristate::from_bool(regime.is_single_cell()),
            Ok(None) => Tristate::Unknown,
            Err(e) => {
                warn!(anchor = %anchor, error = %e, "resolver: regime fault");
                Tristate::Unknown
            }
        }
    }

    /// `hasRequiredColumns` output alone.
    #[must_use]
    pub fn has_required_columns(&self, anchor: Option<&PlRef>) -> Tristate {
        self.resolve(anchor).has_required_columns
    }

    /// Fetches the anchor spec and classifies it. `Ok(None)` if the catalog
    /// does not know the anchor.
    fn regime(&self, anchor: &PlRef) -> Result<Option<Regime>, CatalogError> {
        let Some(spec) = self.catalog.column_spec(anchor)? else {
            debug!(anchor = %anchor, "resolver: anchor spec not available");
            return Ok(None);
        };
        Regime::detect(anchor, &spec, &self.config).map(Some)
    }

    /// Checks every requirement slot in table order.
    ///
    /// Stops at the first slot that is definitely missing. Slots that cannot
    /// be answered keep the verdict `Unknown` unless a later slot is missing.
    #[must_use]
    pub fn check_required(&self, anchor: &PlRef, regime: Regime) -> Tristate {
        let binding = AnchorBinding::main(anchor.clone());
        let mut verdict = Tristate::Yes;
        for slot in REQUIRED_FEATURES {
            verdict = verdict.and(self.check_slot(&binding, slot, regime));
            if verdict.is_no() {
                debug!(anchor = %anchor, slot = %slot, "resolver: required feature missing");
                return Tristate::No;
            }
        }
        verdict
    }

    fn check_slot(&self, binding: &AnchorBinding, slot: &RequirementSlot, regime: Regime) -> Tristate {
        let mut verdict = Tristate::No;
        for &feature in slot.candidates() {
            verdict = verdict.or(self.check_feature(binding, feature, regime));
            if verdict.is_yes() {
                break;
            }
        }
        verdict
    }

    fn check_feature(&self, binding: &AnchorBinding, feature: Feature, regime: Regime) -> Tristate {
        let matchers = build_matchers(feature, regime);
        match self.catalog.matching_columns(binding, matchers.as_slice()) {
            Ok(Some(columns)) => Tristate::from_bool(!columns.is_empty()),
            Ok(None) => {
                debug!(feature = %feature, "resolver: catalog not ready for feature");
                Tristate::Unknown
            }
            Err(e) => {
                warn!(feature = %feature, error = %e, "resolver: feature lookup fault");
                Tristate::Unknown
            }
        }
    }
}

/// Resolves `anchor` against `catalog` with the default configuration.
#[must_use]
pub fn resolve<C: ColumnCatalog + ?Sized>(anchor: Option<&PlRef>, catalog: &C) -> Resolution {
    FeatureResolver::new(catalog).resolve(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::column::{AxisSpec, ColumnSpec};

    fn anchor_spec(grouping: &str) -> ColumnSpec {
        ColumnSpec::new("pl7.app/vdj/readCount", "Long")
            .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID))
            .with_axis(AxisSpec::new(grouping))
    }

    fn feature_spec(grouping: &str, feature: &str, single_cell: bool) -> ColumnSpec {
        let spec = ColumnSpec::new(names::COLUMN_SEQUENCE, "String")
            .with_axis(AxisSpec::new(grouping))
            .with_domain(names::DOMAIN_FEATURE, feature)
            .with_domain(names::DOMAIN_ALPHABET, names::ALPHABET_AMINO_ACID);
        if single_cell {
            spec.with_domain(names::DOMAIN_CHAIN_INDEX, names::CHAIN_PRIMARY)
        } else {
            spec
        }
    }

    fn catalog_with(grouping: &str, features: &[&str], single_cell: bool) -> (InMemoryCatalog, PlRef) {
        let catalog = InMemoryCatalog::new();
        let anchor = PlRef::new("upstream", "clones");
        catalog.insert(anchor.clone(), anchor_spec(grouping)).unwrap();
        for f in features {
            catalog
                .insert(PlRef::new("upstream", format!("{f}-aa")), feature_spec(grouping, f, single_cell))
                .unwrap();
        }
        (catalog, anchor)
    }

    const CORE: [&str; 6] = ["CDR1", "CDR2", "CDR3", "FR1", "FR2", "FR3"];

    #[test]
    fn test_no_anchor_is_unknown() {
        let catalog = InMemoryCatalog::new();
        assert_eq!(resolve(None, &catalog), Resolution::UNKNOWN);
    }

    #[test]
    fn test_stale_anchor_is_unknown() {
        let catalog = InMemoryCatalog::new();
        let r = PlRef::new("gone", "clones");
        assert_eq!(resolve(Some(&r), &catalog), Resolution::UNKNOWN);
        assert_eq!(FeatureResolver::new(&catalog).try_resolve(Some(&r)).unwrap(), Resolution::UNKNOWN);
    }

    #[test]
    fn test_bulk_complete_dataset() {
        let mut features = CORE.to_vec();
        features.push("FR4");
        let (catalog, anchor) = catalog_with(names::AXIS_CLONOTYPE_KEY, &features, false);
        let res = resolve(Some(&anchor), &catalog);
        assert_eq!(res.is_single_cell, Tristate::No);
        assert_eq!(res.has_required_columns, Tristate::Yes);
    }

    #[test]
    fn test_single_cell_fr4_in_frame_variant() {
        let mut features = CORE.to_vec();
        features.push("FR4InFrame");
        let (catalog, anchor) = catalog_with(names::AXIS_SC_CLONOTYPE_KEY, &features, true);
        let res = resolve(Some(&anchor), &catalog);
        assert_eq!(res.is_single_cell, Tristate::Yes);
        assert_eq!(res.has_required_columns, Tristate::Yes);
    }

    #[test]
    fn test_single_cell_without_primary_chain_tag_is_missing() {
        let mut features = CORE.to_vec();
        features.push("FR4");
        let (catalog, anchor) = catalog_with(names::AXIS_SC_CLONOTYPE_KEY, &features, false);
        let res = resolve(Some(&anchor), &catalog);
        assert_eq!(res.is_single_cell, Tristate::Yes);
        assert_eq!(res.has_required_columns, Tristate::No);
    }

    #[test]
    fn test_missing_terminal_region() {
        let (catalog, anchor) = catalog_with(names::AXIS_CLONOTYPE_KEY, &CORE, false);
        assert_eq!(resolve(Some(&anchor), &catalog).has_required_columns, Tristate::No);
    }

    #[test]
    fn test_malformed_anchor_is_unknown_but_surfaced_by_try() {
        let catalog = InMemoryCatalog::new();
        let r = PlRef::new("b", "flat");
        catalog
            .insert(r.clone(), ColumnSpec::new("x", "Long").with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID)))
            .unwrap();
        let resolver = FeatureResolver::new(&catalog);
        assert_eq!(resolver.resolve(Some(&r)), Resolution::UNKNOWN);
        assert_eq!(resolver.is_single_cell(Some(&r)), Tristate::Unknown);
        assert!(matches!(
            resolver.try_resolve(Some(&r)),
            Err(CatalogError::MalformedSpec { .. })
        ));
    }

    #[test]
    fn test_strict_config_rejects_unknown_grouping_axis() {
        let (catalog, anchor) = catalog_with("pl7.app/vdj/cloneId", &CORE, false);
        assert_eq!(resolve(Some(&anchor), &catalog).is_single_cell, Tristate::No);

        let strict = FeatureResolver::with_config(&catalog, ResolverConfig::strict());
        assert!(strict.config().strict_regime);
        assert_eq!(strict.resolve(Some(&anchor)), Resolution::UNKNOWN);
    }

    #[test]
    fn test_resolution_serializes_as_nullable_bools() {
        let res = Resolution {
            is_single_cell: Tristate::No,
            has_required_columns: Tristate::Unknown,
        };
        let json = serde_json::to_value(res).unwrap();
        assert_eq!(json, serde_json::json!({ "isSingleCell": false, "hasRequiredColumns": null }));
    }
}
