//! Properties of the hierarchy predicate over built indexes.

mod common;

use common::fixtures::*;
use descriptor_index::adapters::resolver::JvmTypeResolver;
use descriptor_index::{DescriptorBuilder, DescriptorIndex};

fn build(scan: &descriptor_index::domain::scan::ScanIndex) -> DescriptorIndex {
    DescriptorBuilder::new(Box::new(JvmTypeResolver::new()))
        .build(scan)
        .unwrap()
}

#[test]
fn test_customer_scenario() {
    let index = build(&customer_hierarchy_scan());
    let customer = index.get("shop.Customer").unwrap();
    let domestic = index.get("shop.DomesticCustomer").unwrap();
    let foreign = index.get("shop.ForeignCustomer").unwrap();

    assert!(domestic.is_type_or_super_type(&customer));
    assert!(foreign.is_type_or_super_type(&customer));
    assert!(!customer.is_type_or_super_type(&domestic));
    assert!(!customer.is_type_or_super_type(&foreign));
    assert!(!domestic.is_type_or_super_type(&foreign));
    assert!(!foreign.is_type_or_super_type(&domestic));
}

#[test]
fn test_reflexive_for_every_descriptor() {
    let index = build(&customer_hierarchy_scan());
    for t in index.types() {
        assert!(t.is_type_or_super_type(&t), "{} not reflexive", t.name());
        assert!(t.is_assignable_to(&t));
    }
}

#[test]
fn test_transitive_along_deep_chain() {
    let depth = 40;
    let index = build(&chain_scan(depth));
    let leaf = index.get(&format!("d.L{}", depth - 1)).unwrap();
    let root = index.get("d.L0").unwrap();
    let object = index.get("java.lang.Object").unwrap();

    assert!(leaf.is_type_or_super_type(&root));
    assert!(leaf.is_type_or_super_type(&object));
    assert!(!root.is_type_or_super_type(&leaf));
    assert_eq!(leaf.supertypes().count(), depth);
    assert_eq!(leaf.scanned_root(), root);

    for i in 0..depth {
        for j in 0..=i {
            let lower = index.get(&format!("d.L{i}")).unwrap();
            let upper = index.get(&format!("d.L{j}")).unwrap();
            assert!(lower.is_type_or_super_type(&upper));
        }
    }
}

#[test]
fn test_interfaces_only_count_for_assignability() {
    let index = build(&chain_scan(4));
    let marker = index.get("d.Marker").unwrap();
    let l0 = index.get("d.L0").unwrap();
    let l1 = index.get("d.L1").unwrap();
    let l2 = index.get("d.L2").unwrap();

    assert!(!l1.is_type_or_super_type(&marker));
    assert!(l1.is_assignable_to(&marker));
    assert!(l2.is_assignable_to(&marker));
    assert!(!l0.is_assignable_to(&marker));

    let implementors: Vec<_> = marker.direct_subtypes().iter().map(|t| t.name()).collect();
    assert_eq!(implementors, vec!["d.L1", "d.L3"]);
}

#[test]
fn test_opaque_types_end_the_chain() {
    let index = build(&customer_hierarchy_scan());
    let object = index.get("java.lang.Object").unwrap();
    assert_eq!(object.supertypes().count(), 0);
    assert!(object.all_supertypes().is_empty());

    let customer = index.get("shop.Customer").unwrap();
    let chain: Vec<_> = index
        .get("shop.DomesticCustomer")
        .unwrap()
        .supertypes()
        .map(|t| t.name())
        .collect();
    assert_eq!(chain, vec!["shop.Customer", "java.lang.Object"]);
    assert_eq!(customer.scanned_root(), customer);
}

#[test]
fn test_subtype_queries() {
    let index = build(&customer_hierarchy_scan());
    let customer = index.get("shop.Customer").unwrap();
    let object = index.get("java.lang.Object").unwrap();

    let direct: Vec<_> = customer.direct_subtypes().iter().map(|t| t.name()).collect();
    assert_eq!(direct, vec!["shop.DomesticCustomer", "shop.ForeignCustomer"]);

    let all: Vec<_> = object.all_subtypes().iter().map(|t| t.name()).collect();
    assert_eq!(
        all,
        vec!["shop.DomesticCustomer", "shop.ForeignCustomer", "shop.Customer"]
    );
}

#[test]
fn test_descriptors_from_different_indexes_never_relate() {
    let first = build(&customer_hierarchy_scan());
    let second = build(&customer_hierarchy_scan());
    let a = first.get("shop.DomesticCustomer").unwrap();
    let b = second.get("shop.Customer").unwrap();
    assert!(!a.is_type_or_super_type(&b));
    assert!(!a.is_assignable_to(&b));
}
