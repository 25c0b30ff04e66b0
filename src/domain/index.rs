use crate::domain::annotation::AnnotationMap;
use crate::domain::descriptor::{TypeDescriptor, TypeId, TypeKind};
use crate::domain::edge::HierarchyEdge;
use crate::domain::view::{AnnotatedElement, TypeRef};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Descriptor Index - owns every descriptor of one build.
///
/// Types live in an arena addressed by [`TypeId`]; `by_name` gives every fully-qualified name
/// exactly one slot. The `hierarchy` graph mirrors supertype/interface links with node index
/// `i` standing for `TypeId(i)`, so subtype queries are incoming-edge walks.
#[derive(Debug, Clone, Default)]
pub struct DescriptorIndex {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    hierarchy: DiGraph<TypeId, HierarchyEdge>,
}

impl DescriptorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a fully linked arena. `types[i].id` must be `TypeId(i)`.
    pub(crate) fn from_types(types: Vec<TypeDescriptor>) -> Self {
        let mut by_name = HashMap::with_capacity(types.len());
        let mut hierarchy = DiGraph::with_capacity(types.len(), types.len());

        for (i, t) in types.iter().enumerate() {
            debug_assert_eq!(t.id.index(), i);
            by_name.insert(t.name.clone(), t.id);
            hierarchy.add_node(t.id);
        }
        for t in &types {
            let from = node(t.id);
            if let Some(sup) = t.super_type {
                hierarchy.add_edge(from, node(sup), HierarchyEdge::Extends);
            }
            for &iface in &t.interfaces {
                hierarchy.add_edge(from, node(iface), HierarchyEdge::Implements);
            }
        }

        Self {
            types,
            by_name,
            hierarchy,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Raw descriptor for an id issued by this index.
    ///
    /// # Panics
    ///
    /// If `id` came from another index and is out of range here; see [`Self::try_descriptor`].
    pub fn descriptor(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    /// Raw descriptor, or `None` when `id` is out of range for this index.
    pub fn try_descriptor(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index())
    }

    /// # Panics
    ///
    /// Under the same condition as [`Self::descriptor`].
    pub fn type_ref(&self, id: TypeId) -> TypeRef<'_> {
        TypeRef::new(self, self.descriptor(id))
    }

    pub fn try_type_ref(&self, id: TypeId) -> Option<TypeRef<'_>> {
        self.try_descriptor(id).map(|d| TypeRef::new(self, d))
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<TypeRef<'_>> {
        self.lookup(name).map(|id| self.type_ref(id))
    }

    /// All descriptors in id order.
    pub fn types(&self) -> impl Iterator<Item = TypeRef<'_>> {
        self.types.iter().map(move |t| TypeRef::new(self, t))
    }

    /// Only descriptors that came from the scan (no primitives, arrays or library types).
    pub fn scanned_types(&self) -> impl Iterator<Item = TypeRef<'_>> {
        self.types().filter(|t| t.descriptor().is_scanned())
    }

    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }

    pub fn field_count(&self) -> usize {
        self.types.iter().map(|t| t.fields.len()).sum()
    }

    pub fn hierarchy(&self) -> &DiGraph<TypeId, HierarchyEdge> {
        &self.hierarchy
    }

    pub fn edge_count(&self) -> usize {
        self.hierarchy.edge_count()
    }

    /// Types whose superclass or interface list names `id` directly, sorted by id.
    pub fn direct_subtypes(&self, id: TypeId) -> Vec<TypeId> {
        let mut subs: Vec<TypeId> = self
            .hierarchy
            .neighbors_directed(node(id), Direction::Incoming)
            .map(|n| self.hierarchy[n])
            .collect();
        subs.sort();
        subs.dedup();
        subs
    }

    /// Types, fields and methods carrying `annotation`, in id order; per type the type itself
    /// first, then its fields, then its methods.
    pub fn annotated(&self, annotation: &str) -> Vec<AnnotatedElement<'_>> {
        let mut out = Vec::new();
        for t in self.scanned_types() {
            if t.annotation(annotation).is_some() {
                out.push(AnnotatedElement::Type(t));
            }
            out.extend(
                t.fields()
                    .filter(|f| f.annotations().contains_key(annotation))
                    .map(AnnotatedElement::Field),
            );
            out.extend(
                t.methods()
                    .filter(|m| m.annotation(annotation).is_some())
                    .map(AnnotatedElement::Method),
            );
        }
        out
    }

    /// Same names, kinds, modifiers, hierarchy edges, members and annotations, compared by
    /// name so that id assignment does not matter.
    pub fn structurally_equivalent(&self, other: &DescriptorIndex) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.types.iter().all(|t| match other.lookup(&t.name) {
            Some(oid) => self.shape(t) == other.shape(other.descriptor(oid)),
            None => false,
        })
    }

    fn shape<'a>(&'a self, t: &'a TypeDescriptor) -> TypeShape<'a> {
        let name_of = move |id: TypeId| -> &'a str { self.descriptor(id).name.as_str() };
        TypeShape {
            kind: t.kind.label(),
            component: match t.kind {
                TypeKind::Array { component } => Some(name_of(component)),
                _ => None,
            },
            modifiers: t.modifiers.bits(),
            super_type: t.super_type.map(name_of),
            interfaces: t.interfaces.iter().map(|&i| name_of(i)).collect(),
            fields: t
                .fields
                .iter()
                .map(|f| (f.name(), f.modifiers().bits(), name_of(f.field_type()), f.annotations()))
                .collect(),
            methods: t
                .methods
                .iter()
                .map(|m| MethodShape {
                    name: m.name(),
                    modifiers: m.modifiers().bits(),
                    return_type: name_of(m.return_type()),
                    parameter_types: m.parameter_types().iter().map(|&p| name_of(p)).collect(),
                    annotations: m.annotations(),
                })
                .collect(),
            annotations: &t.annotations,
            source: t.source.as_deref(),
        }
    }
}

fn node(id: TypeId) -> NodeIndex {
    NodeIndex::new(id.index())
}

#[derive(PartialEq)]
struct TypeShape<'a> {
    kind: &'static str,
    component: Option<&'a str>,
    modifiers: u32,
    super_type: Option<&'a str>,
    interfaces: Vec<&'a str>,
    fields: Vec<(&'a str, u32, &'a str, &'a AnnotationMap)>,
    methods: Vec<MethodShape<'a>>,
    annotations: &'a AnnotationMap,
    source: Option<&'a str>,
}

#[derive(PartialEq)]
struct MethodShape<'a> {
    name: &'a str,
    modifiers: u32,
    return_type: &'a str,
    parameter_types: Vec<&'a str>,
    annotations: &'a AnnotationMap,
}
