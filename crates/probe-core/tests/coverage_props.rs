use probe_core::{Catalog, OperationDescriptor, Shape, TestMeta, TypeInfo, TypeIntrospector, Value};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn catalog(methods: usize) -> Arc<Catalog> {
    let mut info = TypeInfo::new("Target").constructor("new", vec![], |_| {
        Ok(Value::object("Target", ()))
    });
    for i in 0..methods {
        info = info.method(format!("m{}", i), vec![], Shape::Void, |_, _| Ok(Value::Unit));
    }
    Catalog::builder().register_type(info).build().unwrap()
}

fn covering(catalog: &Catalog, name: &str, picks: &BTreeSet<usize>) -> TestMeta {
    let ops: Vec<OperationDescriptor> = catalog.public_operations("Target").into_iter().collect();
    let covered = ops
        .iter()
        .enumerate()
        .filter(|(i, _)| picks.contains(i))
        .map(|(_, op)| op.clone());
    TestMeta::new(catalog, &["Target"], name, "property", covered).unwrap()
}

proptest! {
    #[test]
    fn test_coverage_grows_with_covered_set(
        methods in 1usize..12,
        small in prop::collection::btree_set(0usize..13, 0..13),
        extra in prop::collection::btree_set(0usize..13, 0..13),
    ) {
        let catalog = catalog(methods);
        let big: BTreeSet<usize> = small.union(&extra).copied().collect();

        let a = covering(&catalog, "a", &small).coverage().clone();
        let b = covering(&catalog, "b", &big).coverage().clone();

        let ra = a.ratio().unwrap();
        let rb = b.ratio().unwrap();
        prop_assert!((0.0..=1.0).contains(&ra));
        prop_assert!(ra <= rb);
        prop_assert_eq!(a.total_count(), methods + 1);
        prop_assert!(a.covered_count() <= a.total_count());
    }

    #[test]
    fn test_merged_coverage_dominates_parts(
        methods in 1usize..12,
        left in prop::collection::btree_set(0usize..13, 0..13),
        right in prop::collection::btree_set(0usize..13, 0..13),
    ) {
        let catalog = catalog(methods);
        let a = covering(&catalog, "a", &left).coverage().clone();
        let b = covering(&catalog, "b", &right).coverage().clone();

        let mut merged = a.clone();
        merged.merge(&b);

        prop_assert!(merged.ratio().unwrap() >= a.ratio().unwrap());
        prop_assert!(merged.ratio().unwrap() >= b.ratio().unwrap());
        prop_assert_eq!(merged.total_count(), a.total_count());
    }
}

#[test]
fn test_full_cover_is_one() {
    let catalog = catalog(3);
    let all: BTreeSet<usize> = (0..4).collect();
    let coverage = covering(&catalog, "all", &all).coverage().clone();
    assert_eq!(coverage.ratio(), Some(1.0));
    assert!(coverage.uncovered_methods().is_empty());
    assert!(coverage.uncovered_constructors().is_empty());
}
