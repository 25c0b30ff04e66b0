//! Descriptor construction: linking, shared identity, fallback resolution and rejection.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::fixtures::*;
use common::mock::{MockScanSource, MockTypeResolver, SharedResolver};
use descriptor_index::adapters::resolver::{ClosedWorldResolver, JvmTypeResolver};
use descriptor_index::domain::ports::{Resolution, ScanSource};
use descriptor_index::{DescriptorBuilder, DescriptorError, TypeKind};

fn jvm_builder() -> DescriptorBuilder {
    DescriptorBuilder::new(Box::new(JvmTypeResolver::new()))
}

#[test]
fn test_customer_model_links_forward_references() {
    let index = jvm_builder().build(&customer_hierarchy_scan()).unwrap();

    let customer = index.get("shop.Customer").unwrap();
    let domestic = index.get("shop.DomesticCustomer").unwrap();
    assert_eq!(domestic.super_type(), Some(customer));
    assert_eq!(customer.kind(), TypeKind::Class);
    assert_eq!(customer.descriptor().source(), Some("shop/Model.class"));

    let object = customer.super_type().unwrap();
    assert_eq!(object.name(), "java.lang.Object");
    assert_eq!(object.kind(), TypeKind::Opaque);
    assert!(object.super_type().is_none());
    assert_eq!(object.methods().len(), 0);
}

#[test]
fn test_same_name_resolves_to_one_descriptor() {
    let index = jvm_builder().build(&customer_hierarchy_scan()).unwrap();
    let customer = index.get("shop.Customer").unwrap();
    let domestic = index.get("shop.DomesticCustomer").unwrap();

    let name_type = customer.fields().nth(1).unwrap().field_type();
    let tax_type = domestic.fields().next().unwrap().field_type();
    let setter_param = customer
        .methods_named("setName")
        .next()
        .unwrap()
        .parameter_types()
        .next()
        .unwrap();
    assert_eq!(name_type, tax_type);
    assert_eq!(name_type, setter_param);
    assert_eq!(name_type.id(), index.lookup("java.lang.String").unwrap());
}

#[test]
fn test_every_member_has_declaring_type_and_annotation_map() {
    let index = jvm_builder().build(&customer_hierarchy_scan()).unwrap();
    for t in index.types() {
        for m in t.methods() {
            assert_eq!(m.declaring_type(), t);
            if m.name() != "getId" {
                assert!(m.annotations().is_empty(), "{m} has annotations");
            }
        }
        for f in t.fields() {
            assert_eq!(f.declaring_type(), t);
            if f.name() != "id" {
                assert!(f.annotations().is_empty(), "{f} has annotations");
            }
        }
    }

    let customer = index.get("shop.Customer").unwrap();
    let get_name = customer.methods_named("getName").next().unwrap();
    assert!(get_name.annotations().is_empty());
    assert!(get_name.annotation("javax.persistence.Id").is_none());
    let get_id = customer.methods_named("getId").next().unwrap();
    assert!(get_id.annotation("javax.persistence.Id").is_some());
}

#[test]
fn test_method_display_is_type_hash_name() {
    let index = jvm_builder().build(&customer_hierarchy_scan()).unwrap();
    let customer = index.get("shop.Customer").unwrap();
    let set_name = customer.methods_named("setName").next().unwrap();
    assert_eq!(set_name.to_string(), "shop.Customer#setName");
    assert_eq!(set_name.signature_text(), "setName(java.lang.String): void");
    assert_eq!(set_name.return_type().kind(), TypeKind::Primitive);
}

#[test]
fn test_overloads_are_distinct_signatures() {
    let index = jvm_builder().build(&overloads_scan()).unwrap();
    let finder = index.get("repo.Finder").unwrap();

    let finds: Vec<_> = finder.methods_named("find").collect();
    assert_eq!(finds.len(), 3);
    let signatures: HashSet<_> = finds.iter().map(|m| m.signature()).collect();
    assert_eq!(signatures.len(), 3);

    let by_string = finder.find_method("find", &["java.lang.String"]).unwrap();
    assert_eq!(by_string.parameter_types().len(), 1);
    assert!(finder.find_method("find", &["int"]).is_none());
    assert!(finder
        .find_method("find", &["java.lang.String", "int"])
        .is_some());

    let me = finder.methods_named("self").next().unwrap();
    assert_eq!(me.return_type(), finder);
}

#[test]
fn test_unresolved_reference_fails_strict_build() {
    let err = jvm_builder().build(&unresolved_scan()).unwrap_err();
    assert!(err.errors.contains(&DescriptorError::UnresolvedTypeDescriptor {
        type_name: "other.Missing".into(),
        referenced_from: "app.Order".into(),
    }));
    assert!(err.to_string().contains("other.Missing"));
}

#[test]
fn test_lenient_build_drops_dependents_transitively() {
    let report = jvm_builder().build_lenient(&unresolved_scan());
    assert!(report.index.get("app.Order").is_none());
    assert!(report.index.get("app.Invoice").is_none());
    assert!(report.index.get("app.Note").is_some());
    assert_eq!(report.rejected.len(), 2);
    assert!(report
        .rejected
        .contains(&DescriptorError::UnresolvedTypeDescriptor {
            type_name: "app.Order".into(),
            referenced_from: "app.Invoice".into(),
        }));
}

#[test]
fn test_cyclic_inheritance_is_rejected() {
    let report = jvm_builder().build_lenient(&cyclic_scan());
    let cyclic: Vec<_> = report
        .rejected
        .iter()
        .filter(|e| matches!(e, DescriptorError::CyclicInheritance { .. }))
        .collect();
    assert_eq!(cyclic.len(), 3);
    assert!(report.index.get("a.Free").is_some());
    assert!(report.index.get("a.A").is_none());

    assert!(jvm_builder().build(&cyclic_scan()).is_err());
}

#[test]
fn test_closed_world_rejects_library_references() {
    let builder = DescriptorBuilder::new(Box::new(ClosedWorldResolver));
    let err = builder.build(&customer_hierarchy_scan()).unwrap_err();
    assert!(err.errors.iter().all(|e| e.kind() == "unresolved_type_descriptor"));

    let mut scan = overloads_scan();
    scan.units[0].types[0].super_type = None;
    scan.units[0].types[0].methods.retain(|m| m.name.as_deref() == Some("self"));
    assert!(builder.build(&scan).is_ok());
}

#[test]
fn test_resolver_is_asked_once_per_name() {
    let mock = Arc::new(
        MockTypeResolver::new()
            .library("java.lang.Object")
            .library("java.lang.String")
            .library("java.lang.Integer")
            .accept("void", Resolution::Primitive),
    );
    let builder = DescriptorBuilder::new(Box::new(SharedResolver(mock.clone())));
    builder.build(&customer_hierarchy_scan()).unwrap();

    let asked = mock.asked();
    let distinct: HashSet<_> = asked.iter().collect();
    assert_eq!(asked.len(), distinct.len(), "asked twice: {asked:?}");
    assert!(!asked.iter().any(|n| n.starts_with("shop.")));
}

#[test]
fn test_malformed_entries_are_reported() {
    let mut nameless = class("x.Ignored", None);
    nameless.name = Some(String::new());
    let mut no_field_type = class("x.Broken", None);
    let mut f = field("f", "int");
    f.field_type = None;
    no_field_type.fields.push(f);
    let user = class("x.User", Some("x.Broken"));

    let report = jvm_builder().build_lenient(&scan(vec![nameless, no_field_type, user]));
    let malformed = report
        .rejected
        .iter()
        .filter(|e| matches!(e, DescriptorError::MalformedIndexEntry { .. }))
        .count();
    assert_eq!(malformed, 2);
    assert!(report.index.is_empty());
}

#[test]
fn test_rebuild_is_structurally_equivalent() {
    let scan = MockScanSource::new(customer_hierarchy_scan()).load().unwrap();
    let first = jvm_builder().build(&scan).unwrap();
    let second = jvm_builder().build(&scan).unwrap();
    assert!(first.structurally_equivalent(&second));

    let other = jvm_builder().build(&overloads_scan()).unwrap();
    assert!(!first.structurally_equivalent(&other));
}

#[test]
fn test_arrays_link_to_component_descriptors() {
    let mut holder = class("a.Holder", Some("java.lang.Object"));
    holder.fields.push(field("grid", "a.Holder[][]"));
    let index = jvm_builder().build(&scan(vec![holder])).unwrap();

    let grid = index.get("a.Holder").unwrap().fields().next().unwrap().field_type();
    assert_eq!(grid.name(), "a.Holder[][]");
    let row = grid.component_type().unwrap();
    assert_eq!(row.name(), "a.Holder[]");
    assert_eq!(row.component_type(), index.get("a.Holder"));
}

fn holder_with_field_of(field_type: &str) -> descriptor_index::domain::scan::ScanIndex {
    let mut holder = class("a.Holder", Some("java.lang.Object"));
    holder.fields.push(field("deep", field_type));
    scan(vec![holder])
}

#[test]
fn test_array_nesting_limit_is_255_for_every_component() {
    for component in ["int", "java.lang.String", "a.Holder"] {
        let at_limit = format!("{component}{}", "[]".repeat(255));
        let index = jvm_builder()
            .build(&holder_with_field_of(&at_limit))
            .unwrap_or_else(|e| panic!("{component} x255: {e}"));
        let deep = index.get("a.Holder").unwrap().fields().next().unwrap().field_type();
        assert_eq!(deep.name(), at_limit);

        let over = format!("{component}{}", "[]".repeat(256));
        let err = jvm_builder().build(&holder_with_field_of(&over)).unwrap_err();
        assert_eq!(
            err.errors,
            vec![DescriptorError::UnresolvedTypeDescriptor {
                type_name: over,
                referenced_from: "a.Holder".into(),
            }]
        );
    }
}
