//! Borrowed views pairing a descriptor with its owning index, so that type references read as
//! descriptors instead of raw ids.

use std::fmt;

use crate::domain::annotation::{AnnotationInstance, AnnotationMap};
use crate::domain::descriptor::{
    FieldDescriptor, MethodDescriptor, MethodSignature, TypeDescriptor, TypeId, TypeKind,
};
use crate::domain::index::DescriptorIndex;
use crate::domain::modifiers::Modifiers;

/// A type descriptor together with the index that resolves its links.
#[derive(Clone, Copy)]
pub struct TypeRef<'a> {
    index: &'a DescriptorIndex,
    descriptor: &'a TypeDescriptor,
}

impl<'a> TypeRef<'a> {
    pub(crate) fn new(index: &'a DescriptorIndex, descriptor: &'a TypeDescriptor) -> Self {
        Self { index, descriptor }
    }

    pub fn index(&self) -> &'a DescriptorIndex {
        self.index
    }

    pub fn descriptor(&self) -> &'a TypeDescriptor {
        self.descriptor
    }

    pub fn id(&self) -> TypeId {
        self.descriptor.id()
    }

    pub fn name(&self) -> &'a str {
        self.descriptor.name()
    }

    pub fn simple_name(&self) -> &'a str {
        self.descriptor.simple_name()
    }

    pub fn kind(&self) -> TypeKind {
        self.descriptor.kind()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.descriptor.modifiers()
    }

    pub fn super_type(&self) -> Option<TypeRef<'a>> {
        self.descriptor.super_type().map(|id| self.index.type_ref(id))
    }

    pub fn interfaces(&self) -> impl ExactSizeIterator<Item = TypeRef<'a>> + 'a {
        let index = self.index;
        self.descriptor
            .interfaces()
            .iter()
            .map(move |&id| index.type_ref(id))
    }

    /// Element type for array descriptors.
    pub fn component_type(&self) -> Option<TypeRef<'a>> {
        match self.descriptor.kind() {
            TypeKind::Array { component } => Some(self.index.type_ref(component)),
            _ => None,
        }
    }

    pub fn methods(&self) -> impl ExactSizeIterator<Item = MethodRef<'a>> + 'a {
        let index = self.index;
        self.descriptor
            .methods()
            .iter()
            .map(move |m| MethodRef::new(index, m))
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldRef<'a>> + 'a {
        let index = self.index;
        self.descriptor
            .fields()
            .iter()
            .map(move |f| FieldRef::new(index, f))
    }

    pub fn annotations(&self) -> &'a AnnotationMap {
        self.descriptor.annotations()
    }

    pub fn annotation(&self, name: &str) -> Option<&'a AnnotationInstance> {
        self.descriptor.annotation(name)
    }

    /// Declared overloads named `name`.
    pub fn methods_named(&self, name: &'a str) -> impl Iterator<Item = MethodRef<'a>> + 'a {
        let index = self.index;
        self.descriptor
            .methods_named(name)
            .map(move |m| MethodRef::new(index, m))
    }

    /// Declared method with exactly these parameter type names, in order.
    pub fn find_method(&self, name: &str, parameter_types: &[&str]) -> Option<MethodRef<'a>> {
        let ids = parameter_types
            .iter()
            .map(|p| self.index.lookup(p))
            .collect::<Option<Vec<_>>>()?;
        self.descriptor
            .find_method(name, &ids)
            .map(|m| MethodRef::new(self.index, m))
    }
}

impl PartialEq for TypeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.index, other.index) && self.id() == other.id()
    }
}

impl Eq for TypeRef<'_> {}

impl fmt::Debug for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name())
    }
}

impl fmt::Display for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A method descriptor with its links resolved through the index.
#[derive(Clone, Copy)]
pub struct MethodRef<'a> {
    index: &'a DescriptorIndex,
    method: &'a MethodDescriptor,
}

impl<'a> MethodRef<'a> {
    pub(crate) fn new(index: &'a DescriptorIndex, method: &'a MethodDescriptor) -> Self {
        Self { index, method }
    }

    pub fn descriptor(&self) -> &'a MethodDescriptor {
        self.method
    }

    pub fn name(&self) -> &'a str {
        self.method.name()
    }

    pub fn declaring_type(&self) -> TypeRef<'a> {
        self.index.type_ref(self.method.declaring_type())
    }

    pub fn modifiers(&self) -> Modifiers {
        self.method.modifiers()
    }

    pub fn return_type(&self) -> TypeRef<'a> {
        self.index.type_ref(self.method.return_type())
    }

    pub fn parameter_types(&self) -> impl ExactSizeIterator<Item = TypeRef<'a>> + 'a {
        let index = self.index;
        self.method
            .parameter_types()
            .iter()
            .map(move |&id| index.type_ref(id))
    }

    pub fn annotations(&self) -> &'a AnnotationMap {
        self.method.annotations()
    }

    pub fn annotation(&self, name: &str) -> Option<&'a AnnotationInstance> {
        self.method.annotation(name)
    }

    pub fn signature(&self) -> MethodSignature {
        self.method.signature()
    }

    /// `name(param, ...): return`, with fully-qualified type names.
    pub fn signature_text(&self) -> String {
        let params: Vec<&str> = self.parameter_types().map(|t| t.name()).collect();
        format!(
            "{}({}): {}",
            self.name(),
            params.join(", "),
            self.return_type().name()
        )
    }
}

impl fmt::Debug for MethodRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodRef({self})")
    }
}

/// Diagnostic form `<declaringTypeName>#<methodName>`; not an identity.
impl fmt::Display for MethodRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.declaring_type().name(), self.name())
    }
}

#[derive(Clone, Copy)]
pub struct FieldRef<'a> {
    index: &'a DescriptorIndex,
    field: &'a FieldDescriptor,
}

impl<'a> FieldRef<'a> {
    pub(crate) fn new(index: &'a DescriptorIndex, field: &'a FieldDescriptor) -> Self {
        Self { index, field }
    }

    pub fn descriptor(&self) -> &'a FieldDescriptor {
        self.field
    }

    pub fn name(&self) -> &'a str {
        self.field.name()
    }

    pub fn declaring_type(&self) -> TypeRef<'a> {
        self.index.type_ref(self.field.declaring_type())
    }

    pub fn modifiers(&self) -> Modifiers {
        self.field.modifiers()
    }

    pub fn field_type(&self) -> TypeRef<'a> {
        self.index.type_ref(self.field.field_type())
    }

    pub fn annotations(&self) -> &'a AnnotationMap {
        self.field.annotations()
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldRef({self})")
    }
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type().name(), self.name())
    }
}

/// Any element that can carry annotations.
#[derive(Debug, Clone, Copy)]
pub enum AnnotatedElement<'a> {
    Type(TypeRef<'a>),
    Method(MethodRef<'a>),
    Field(FieldRef<'a>),
}

impl AnnotatedElement<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotatedElement::Type(_) => "type",
            AnnotatedElement::Method(_) => "method",
            AnnotatedElement::Field(_) => "field",
        }
    }
}

impl fmt::Display for AnnotatedElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotatedElement::Type(t) => fmt::Display::fmt(t, f),
            AnnotatedElement::Method(m) => fmt::Display::fmt(m, f),
            AnnotatedElement::Field(x) => fmt::Display::fmt(x, f),
        }
    }
}
