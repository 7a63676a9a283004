use criterion::{black_box, criterion_group, criterion_main, Criterion};

use paratope_block::{names, AxisSpec, ColumnSpec, FeatureResolver, InMemoryCatalog, PlRef};

fn make_catalog(single_cell: bool) -> (InMemoryCatalog, PlRef) {
    let catalog = InMemoryCatalog::new();
    let grouping = if single_cell {
        names::AXIS_SC_CLONOTYPE_KEY
    } else {
        names::AXIS_CLONOTYPE_KEY
    };

    let anchor = PlRef::new("mixcr", "clones");
    catalog
        .insert(
            anchor.clone(),
            ColumnSpec::new("pl7.app/vdj/readCount", "Long")
                .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID))
                .with_axis(AxisSpec::new(grouping))
                .with_annotation(names::ANNOTATION_IS_ANCHOR, "true"),
        )
        .unwrap();

    // Realistic upstream export: every region in both alphabets, plus noise
    // columns from unrelated blocks.
    for feature in ["FR1", "CDR1", "FR2", "CDR2", "FR3", "CDR3", "FR4InFrame"] {
        for alphabet in [names::ALPHABET_AMINO_ACID, "nucleotide"] {
            let mut spec = ColumnSpec::new(names::COLUMN_SEQUENCE, "String")
                .with_axis(AxisSpec::new(grouping))
                .with_domain(names::DOMAIN_FEATURE, feature)
                .with_domain(names::DOMAIN_ALPHABET, alphabet);
            if single_cell {
                spec = spec.with_domain(names::DOMAIN_CHAIN_INDEX, names::CHAIN_PRIMARY);
            }
            catalog
                .insert(PlRef::new("mixcr", format!("{feature}-{alphabet}")), spec)
                .unwrap();
        }
    }
    for i in 0..256u32 {
        catalog
            .insert(
                PlRef::new(format!("other-{i}"), "abundance"),
                ColumnSpec::new("pl7.app/abundance", "Double")
                    .with_axis(AxisSpec::new(names::AXIS_SAMPLE_ID)),
            )
            .unwrap();
    }

    (catalog, anchor)
}

fn bench_resolve(c: &mut Criterion) {
    for (name, single_cell) in [("resolve/bulk", false), ("resolve/single_cell", true)] {
        let (catalog, anchor) = make_catalog(single_cell);
        let resolver = FeatureResolver::new(&catalog);
        c.bench_function(name, |b| {
            b.iter(|| black_box(resolver.resolve(Some(black_box(&anchor)))));
        });
    }
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
