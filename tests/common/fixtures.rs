//! Scan index fixtures for integration tests.
#![allow(dead_code)]

use descriptor_index::domain::modifiers::Modifiers;
use descriptor_index::domain::scan::{
    AnnotationRecord, CompilationUnit, DeclaredKind, FieldRecord, MethodRecord, ScanIndex,
    TypeRecord,
};
use serde_json::Value;

pub const PUBLIC: u32 = Modifiers::PUBLIC;
pub const PRIVATE: u32 = Modifiers::PRIVATE;

pub fn annotation(name: &str, values: &[(&str, Value)]) -> AnnotationRecord {
    AnnotationRecord {
        name: Some(name.to_string()),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

pub fn marker(name: &str) -> AnnotationRecord {
    annotation(name, &[])
}

pub fn class(name: &str, super_type: Option<&str>) -> TypeRecord {
    TypeRecord {
        name: Some(name.to_string()),
        kind: DeclaredKind::Class,
        modifiers: Some(PUBLIC),
        super_type: super_type.map(String::from),
        ..Default::default()
    }
}

pub fn interface(name: &str, extends: &[&str]) -> TypeRecord {
    TypeRecord {
        name: Some(name.to_string()),
        kind: DeclaredKind::Interface,
        modifiers: Some(PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT),
        interfaces: extends.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

pub fn method(name: &str, return_type: &str, parameter_types: &[&str]) -> MethodRecord {
    MethodRecord {
        name: Some(name.to_string()),
        modifiers: Some(PUBLIC),
        return_type: Some(return_type.to_string()),
        parameter_types: parameter_types.iter().map(|s| s.to_string()).collect(),
        annotations: None,
    }
}

pub fn field(name: &str, field_type: &str) -> FieldRecord {
    FieldRecord {
        name: Some(name.to_string()),
        modifiers: Some(PRIVATE),
        field_type: Some(field_type.to_string()),
        annotations: None,
    }
}

pub fn with_annotations(mut record: TypeRecord, annotations: Vec<AnnotationRecord>) -> TypeRecord {
    record.annotations = Some(annotations);
    record
}

pub fn scan(types: Vec<TypeRecord>) -> ScanIndex {
    ScanIndex {
        project_root: "/work/shop".to_string(),
        units: vec![CompilationUnit {
            relative_path: "shop/Model.class".to_string(),
            types,
        }],
    }
}

/// Joined-inheritance customer model:
/// `Customer` (concrete root, `@Inheritance(JOINED)`) with subclasses `DomesticCustomer` and
/// `ForeignCustomer`, all `@Entity`. Subclasses are listed before the root so links are forward.
pub fn customer_hierarchy_scan() -> ScanIndex {
    let mut domestic = with_annotations(
        class("shop.DomesticCustomer", Some("shop.Customer")),
        vec![
            marker("javax.persistence.Entity"),
            annotation(
                "javax.persistence.Table",
                &[("name", Value::from("DOMESTIC_CUSTOMER"))],
            ),
        ],
    );
    domestic.fields.push(field("taxId", "java.lang.String"));
    domestic.methods.push(method("getTaxId", "java.lang.String", &[]));

    let mut foreign = with_annotations(
        class("shop.ForeignCustomer", Some("shop.Customer")),
        vec![
            marker("javax.persistence.Entity"),
            annotation(
                "javax.persistence.Table",
                &[("name", Value::from("FOREIGN_CUSTOMER"))],
            ),
        ],
    );
    foreign.fields.push(field("vat", "java.lang.String"));
    foreign.methods.push(method("getVat", "java.lang.String", &[]));

    let mut customer = with_annotations(
        class("shop.Customer", Some("java.lang.Object")),
        vec![
            marker("javax.persistence.Entity"),
            annotation(
                "javax.persistence.Inheritance",
                &[("strategy", Value::from("JOINED"))],
            ),
            annotation("javax.persistence.Table", &[("name", Value::from("CUSTOMER"))]),
        ],
    );
    let mut id = field("id", "java.lang.Integer");
    id.annotations = Some(vec![marker("javax.persistence.Id")]);
    customer.fields.push(id);
    customer.fields.push(field("name", "java.lang.String"));
    let mut get_id = method("getId", "java.lang.Integer", &[]);
    get_id.annotations = Some(vec![marker("javax.persistence.Id")]);
    customer.methods.push(get_id);
    customer.methods.push(method("getName", "java.lang.String", &[]));
    customer
        .methods
        .push(method("setName", "void", &["java.lang.String"]));

    scan(vec![domestic, foreign, customer])
}

/// `a.A extends a.B extends a.C extends a.A`, plus an unaffected `a.Free`.
pub fn cyclic_scan() -> ScanIndex {
    scan(vec![
        class("a.A", Some("a.B")),
        class("a.B", Some("a.C")),
        class("a.C", Some("a.A")),
        class("a.Free", Some("java.lang.Object")),
    ])
}

/// `app.Order` references `other.Missing`; `app.Invoice` extends `app.Order`; `app.Note` is fine.
pub fn unresolved_scan() -> ScanIndex {
    let mut order = class("app.Order", Some("java.lang.Object"));
    order.methods.push(method("customer", "other.Missing", &[]));
    let invoice = class("app.Invoice", Some("app.Order"));
    let mut note = class("app.Note", Some("java.lang.Object"));
    note.methods.push(method("text", "java.lang.String", &[]));
    scan(vec![order, invoice, note])
}

/// `repo.Finder` with three `find` overloads and one self-returning method.
pub fn overloads_scan() -> ScanIndex {
    let mut finder = class("repo.Finder", Some("java.lang.Object"));
    finder.methods.push(method("find", "java.lang.Object", &["long"]));
    finder
        .methods
        .push(method("find", "java.lang.Object", &["java.lang.String"]));
    finder
        .methods
        .push(method("find", "java.lang.Object", &["java.lang.String", "int"]));
    finder.methods.push(method("self", "repo.Finder", &[]));
    scan(vec![finder])
}

/// Deep chain `d.L0 <- d.L1 <- ... <- d.L{depth-1}`, with an interface on every odd level.
pub fn chain_scan(depth: usize) -> ScanIndex {
    let mut types = vec![interface("d.Marker", &[])];
    for i in 0..depth {
        let sup = if i == 0 {
            "java.lang.Object".to_string()
        } else {
            format!("d.L{}", i - 1)
        };
        let mut t = class(&format!("d.L{i}"), Some(&sup));
        if i % 2 == 1 {
            t.interfaces.push("d.Marker".to_string());
        }
        types.push(t);
    }
    scan(types)
}

pub fn to_json(scan: &ScanIndex) -> String {
    serde_json::to_string_pretty(scan).expect("serialize scan fixture")
}
