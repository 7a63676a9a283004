//! Catalog-derived block outputs.
//!
//! Computes, in one pass over the catalog, the outputs the block exposes to
//! its UI, plus the few that read the block's own MSA result columns once
//! the pipeline has run. Each output is computed independently
//! so that a fault in one leaves the others intact.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::args::BlockArgs;
use crate::catalog::ColumnCatalog;
use crate::column::{linker_column_id, ColumnId, ColumnSpec, PColumn};
use crate::label::BLOCK_TITLE;
use crate::options::{dataset_options, DatasetOption};
use crate::resolver::{FeatureResolver, ResolverConfig};
use crate::tristate::Tristate;

/// Outputs of the block model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockOutputs {
    /// Selectable input datasets; `None` if the catalog could not list them.
    pub dataset_options: Option<Vec<DatasetOption>>,
    /// Selected dataset is single-cell.
    pub is_single_cell: Tristate,
    /// Selected dataset carries every required feature column.
    pub has_required_columns: Tristate,
    /// Spec of the selected dataset.
    pub input_spec: Option<ColumnSpec>,
    /// Linker column among the MSA result columns, if any.
    pub linker_column_id: Option<ColumnId>,
    /// Arguments are complete enough to run.
    pub args_valid: bool,
    /// Block title.
    pub title: String,
    /// Block subtitle.
    pub subtitle: String,
}

/// Evaluates block outputs against a catalog.
#[derive(Debug)]
pub struct BlockModel<'a, C: ColumnCatalog + ?Sized> {
    resolver: FeatureResolver<'a, C>,
    catalog: &'a C,
}

impl<'a, C: ColumnCatalog + ?Sized> BlockModel<'a, C> {
    /// Creates a model with the default resolver configuration.
    #[must_use]
    pub fn new(catalog: &'a C) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    /// Creates a model with an explicit resolver configuration.
    #[must_use]
    pub fn with_config(catalog: &'a C, config: ResolverConfig) -> Self {
        Self {
            resolver: FeatureResolver::with_config(catalog, config),
            catalog,
        }
    }

    /// Computes all outputs for `args` before the block has produced results.
    #[must_use]
    pub fn outputs(&self, args: &BlockArgs) -> BlockOutputs {
        self.outputs_with_msa(args, None)
    }

    /// Computes all outputs for `args`. `msa_columns` are the block's own
    /// MSA result columns, `None` until the pipeline has run.
    #[must_use]
    pub fn outputs_with_msa(
        &self,
        args: &BlockArgs,
        msa_columns: Option<&[PColumn]>,
    ) -> BlockOutputs {
        let anchor = args.dataset_ref.as_ref();
        let resolution = self.resolver.resolve(anchor);

        let dataset_options = match dataset_options(self.catalog) {
            Ok(options) => Some(options),
            Err(e) => {
                warn!(error = %e, "block: dataset options unavailable");
                None
            }
        };

        let input_spec = anchor.and_then(|r| match self.catalog.column_spec(r) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(anchor = %r, error = %e, "block: input spec unavailable");
                None
            }
        });

        BlockOutputs {
            dataset_options,
            is_single_cell: resolution.is_single_cell,
            has_required_columns: resolution.has_required_columns,
            input_spec,
            linker_column_id: msa_columns.and_then(linker_column_id),
            args_valid: args.args_valid(),
            title: BLOCK_TITLE.to_string(),
            subtitle: args.subtitle().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::column::{names, AxisSpec};
    use crate::reference::PlRef;

    #[test]
    fn test_outputs_without_selection() {
        let catalog = InMemoryCatalog::new();
        let out = BlockModel::new(&catalog).outputs(&BlockArgs::default());
        assert_eq!(out.dataset_options, Some(vec![]));
        assert_eq!(out.is_single_cell, Tristate::Unknown);
        assert_eq!(out.has_required_columns, Tristate::Unknown);
        assert_eq!(out.input_spec, None);
        assert_eq!(out.linker_column_id, None);
        assert!(!out.args_valid);
        assert_eq!(out.title, "Paratope Clustering");
        assert_eq!(out.subtitle, "Paratope 0.5");
    }

    #[test]
    fn test_outputs_with_selection() {
        let catalog = InMemoryCatalog::new();
        let r = PlRef::new("mixcr", "clones");
        let spec = ColumnSpec::new("pl7.app/vdj/readCount", "Long")
            .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID))
            .with_axis(AxisSpec::new(names::AXIS_SC_CLONOTYPE_KEY))
            .with_annotation(names::ANNOTATION_IS_ANCHOR, "true");
        catalog.insert(r.clone(), spec.clone()).unwrap();

        let args = BlockArgs {
            dataset_ref: Some(r),
            ..BlockArgs::default()
        };
        let out = BlockModel::new(&catalog).outputs(&args);
        assert!(out.args_valid);
        assert_eq!(out.is_single_cell, Tristate::Yes);
        assert_eq!(out.has_required_columns, Tristate::No);
        assert_eq!(out.input_spec, Some(spec));
        assert_eq!(out.dataset_options.map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_linker_column_from_msa_results() {
        let catalog = InMemoryCatalog::new();
        let model = BlockModel::new(&catalog);
        let args = BlockArgs::default();

        let msa = ColumnSpec::new("pl7.app/vdj/msa", "String");
        let linker = PColumn::new(msa.clone().with_annotation(names::ANNOTATION_IS_LINKER, "true"));
        let columns = vec![PColumn::new(msa), linker.clone()];

        assert_eq!(model.outputs_with_msa(&args, Some(&columns[..0])).linker_column_id, None);
        assert_eq!(model.outputs_with_msa(&args, Some(&columns[..1])).linker_column_id, None);
        let out = model.outputs_with_msa(&args, Some(&columns));
        assert_eq!(out.linker_column_id, Some(linker.id));

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["linkerColumnId"], serde_json::to_value(linker.id).unwrap());
    }
}
