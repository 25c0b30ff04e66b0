//! Structural scan index: the contract between an external static scanner (bytecode reader,
//! source indexer, ...) and the descriptor builder.
//!
//! **Shape**: one `ScanIndex` holds compilation units, each listing the types it declares. Every
//! type reference is a fully-qualified, erased type name (`java.lang.String`, `int`,
//! `com.acme.Customer[]`). Required attributes are `Option`s here so that an incomplete record
//! can be reported as a malformed entry instead of failing the whole JSON decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a static scan over one or more compilation units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanIndex {
    /// Root the unit paths are relative to (informational; `file://` prefix is stripped on load).
    #[serde(default)]
    pub project_root: String,
    /// Scanned compilation units, in scan order. Order determines descriptor id assignment.
    #[serde(default)]
    pub units: Vec<CompilationUnit>,
}

impl ScanIndex {
    /// Total number of type records across all units.
    pub fn type_count(&self) -> usize {
        self.units.iter().map(|u| u.types.len()).sum()
    }

    /// Appends the units of `other`. Used to merge independently scanned partial indexes
    /// before the single linking pass.
    pub fn merge(&mut self, other: ScanIndex) {
        if self.project_root.is_empty() {
            self.project_root = other.project_root;
        }
        self.units.extend(other.units);
    }
}

/// Types declared by one source or class file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path relative to `project_root` (e.g. `com/acme/Customer.class`).
    #[serde(default)]
    pub relative_path: String,
    pub types: Vec<TypeRecord>,
}

/// Declared kind of a scanned type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// One scanned type declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Fully-qualified name. Required, non-empty.
    pub name: Option<String>,
    #[serde(default)]
    pub kind: DeclaredKind,
    /// Access-flag bitmask. Required.
    pub modifiers: Option<u32>,
    /// Superclass name; `None` for roots and interfaces.
    #[serde(default)]
    pub super_type: Option<String>,
    /// Directly implemented (or, for interfaces, extended) interface names, in declaration order.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
    /// Type-level annotations; absent and empty mean the same thing.
    #[serde(default)]
    pub annotations: Option<Vec<AnnotationRecord>>,
}

impl TypeRecord {
    /// Every type name this record refers to, duplicates included, in a stable order:
    /// supertype, interfaces, field types, then per method return and parameter types.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(sup) = &self.super_type {
            names.push(sup.as_str());
        }
        names.extend(self.interfaces.iter().map(String::as_str));
        for field in &self.fields {
            if let Some(t) = &field.field_type {
                names.push(t.as_str());
            }
        }
        for method in &self.methods {
            if let Some(t) = &method.return_type {
                names.push(t.as_str());
            }
            names.extend(method.parameter_types.iter().map(String::as_str));
        }
        names
    }
}

/// One declared method (constructors included, conventionally named `<init>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Simple name. Required, non-empty.
    pub name: Option<String>,
    /// Access-flag bitmask. Required.
    pub modifiers: Option<u32>,
    /// Return type name (`void` for procedures). Required.
    pub return_type: Option<String>,
    /// Parameter type names, in declaration order.
    #[serde(default)]
    pub parameter_types: Vec<String>,
    #[serde(default)]
    pub annotations: Option<Vec<AnnotationRecord>>,
}

/// One declared field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: Option<String>,
    pub modifiers: Option<u32>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub annotations: Option<Vec<AnnotationRecord>>,
}

/// Raw annotation data: qualified name plus attribute values, uninterpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub name: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}
