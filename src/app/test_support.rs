//! Shared fixtures for app and server unit tests.

use crate::app::dto::EngineOptions;
use crate::app::engine::{DescriptorEngine, build_index};
use crate::domain::modifiers::Modifiers;
use crate::domain::scan::{
    AnnotationRecord, CompilationUnit, MethodRecord, ScanIndex, TypeRecord,
};
use std::collections::BTreeMap;

pub(crate) fn annotation(name: &str, values: &[(&str, &str)]) -> AnnotationRecord {
    AnnotationRecord {
        name: Some(name.into()),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn class(name: &str, super_type: &str, annotations: Vec<AnnotationRecord>) -> TypeRecord {
    TypeRecord {
        name: Some(name.into()),
        modifiers: Some(Modifiers::PUBLIC),
        super_type: Some(super_type.into()),
        annotations: Some(annotations),
        ..Default::default()
    }
}

/// `Customer` (JOINED root) with `DomesticCustomer` and `ForeignCustomer` (entity name `Foreign`).
pub(crate) fn customer_engine() -> DescriptorEngine {
    let mut customer = class(
        "shop.Customer",
        "java.lang.Object",
        vec![
            annotation("javax.persistence.Entity", &[]),
            annotation("javax.persistence.Inheritance", &[("strategy", "JOINED")]),
        ],
    );
    customer.methods.push(MethodRecord {
        name: Some("getName".into()),
        modifiers: Some(Modifiers::PUBLIC),
        return_type: Some("java.lang.String".into()),
        parameter_types: vec![],
        annotations: Some(vec![annotation("javax.persistence.Column", &[])]),
    });
    let scan = ScanIndex {
        project_root: "/shop".into(),
        units: vec![CompilationUnit {
            relative_path: "shop/Customer.class".into(),
            types: vec![
                customer,
                class(
                    "shop.DomesticCustomer",
                    "shop.Customer",
                    vec![annotation("javax.persistence.Entity", &[])],
                ),
                class(
                    "shop.ForeignCustomer",
                    "shop.Customer",
                    vec![annotation("javax.persistence.Entity", &[("name", "Foreign")])],
                ),
            ],
        }],
    };
    let (index, rejected) = build_index(&scan, &EngineOptions::default()).unwrap();
    assert!(rejected.is_empty());
    DescriptorEngine::from_prebuilt("/shop", index)
}

