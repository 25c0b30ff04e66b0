//! Descriptor records stored in the [`DescriptorIndex`](crate::domain::index::DescriptorIndex)
//! arena.
//!
//! Records never own each other: every type reference is a [`TypeId`] into the arena that owns
//! all descriptors, so cycles (a method returning its declaring type, mutually referential types)
//! need no special handling.

use serde::Serialize;

use crate::domain::annotation::{AnnotationInstance, AnnotationMap};
use crate::domain::modifiers::Modifiers;
use crate::domain::scan::DeclaredKind;

/// Arena slot of a type descriptor. Stable for the lifetime of one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of type variants.
///
/// `Class` through `Record` come from the scan. `Primitive`, `Array` and `Opaque` are
/// produced by fallback resolution: they have no supertype and no members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
    Primitive,
    Array { component: TypeId },
    /// Library type outside the scanned set, accepted by name only.
    Opaque,
}

impl TypeKind {
    pub fn is_scanned(&self) -> bool {
        matches!(
            self,
            TypeKind::Class
                | TypeKind::Interface
                | TypeKind::Enum
                | TypeKind::Annotation
                | TypeKind::Record
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
            TypeKind::Record => "record",
            TypeKind::Primitive => "primitive",
            TypeKind::Array { .. } => "array",
            TypeKind::Opaque => "opaque",
        }
    }
}

impl From<DeclaredKind> for TypeKind {
    fn from(kind: DeclaredKind) -> Self {
        match kind {
            DeclaredKind::Class => TypeKind::Class,
            DeclaredKind::Interface => TypeKind::Interface,
            DeclaredKind::Enum => TypeKind::Enum,
            DeclaredKind::Annotation => TypeKind::Annotation,
            DeclaredKind::Record => TypeKind::Record,
        }
    }
}

/// A single class, interface or resolved library type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) super_type: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) methods: Vec<MethodDescriptor>,
    pub(crate) annotations: AnnotationMap,
    pub(crate) source: Option<String>,
}

impl TypeDescriptor {
    /// Member-less descriptor for a name accepted by fallback resolution.
    pub(crate) fn synthetic(id: TypeId, name: String, kind: TypeKind) -> Self {
        Self {
            id,
            name,
            kind,
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC),
            super_type: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: AnnotationMap::new(),
            source: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified name; the descriptor's identity within its index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without package and enclosing-type prefix (`a.b.Outer$Inner` → `Inner`).
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit('.').next().unwrap_or(&self.name);
        tail.rsplit('$').next().unwrap_or(tail)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn super_type(&self) -> Option<TypeId> {
        self.super_type
    }

    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn annotations(&self) -> &AnnotationMap {
        &self.annotations
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationInstance> {
        self.annotations.get(name)
    }

    /// Compilation unit path for scanned types.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_scanned(&self) -> bool {
        self.kind.is_scanned()
    }

    /// All overloads declared under `name`, in declaration order.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MethodDescriptor> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Exact signature lookup among declared (not inherited) methods.
    pub fn find_method(&self, name: &str, parameter_types: &[TypeId]) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.parameter_types == parameter_types)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Method identity within a declaring type: name plus ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<TypeId>,
}

/// One declared method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: TypeId,
    modifiers: Modifiers,
    return_type: TypeId,
    parameter_types: Vec<TypeId>,
    annotations: AnnotationMap,
}

impl MethodDescriptor {
    /// `annotations: None` stores an empty map.
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeId,
        modifiers: Modifiers,
        return_type: TypeId,
        parameter_types: Vec<TypeId>,
        annotations: Option<AnnotationMap>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            modifiers,
            return_type,
            parameter_types,
            annotations: annotations.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn return_type(&self) -> TypeId {
        self.return_type
    }

    pub fn parameter_types(&self) -> &[TypeId] {
        &self.parameter_types
    }

    pub fn annotations(&self) -> &AnnotationMap {
        &self.annotations
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationInstance> {
        self.annotations.get(name)
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            parameter_types: self.parameter_types.clone(),
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    declaring_type: TypeId,
    modifiers: Modifiers,
    field_type: TypeId,
    annotations: AnnotationMap,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeId,
        modifiers: Modifiers,
        field_type: TypeId,
        annotations: Option<AnnotationMap>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            modifiers,
            field_type,
            annotations: annotations.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn field_type(&self) -> TypeId {
        self.field_type
    }

    pub fn annotations(&self) -> &AnnotationMap {
        &self.annotations
    }
}
