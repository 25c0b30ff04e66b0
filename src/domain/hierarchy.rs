//! Type-hierarchy resolution over a built index.
//!
//! The superclass chain is walked explicitly through `super_type` links. Interface closure and
//! subtype queries go through the index's hierarchy graph. All walks are bounded by the number
//! of descriptors, and opaque library types end a chain because they carry no supertype.

use petgraph::visit::{Bfs, Reversed};

use crate::domain::descriptor::TypeId;
use crate::domain::index::DescriptorIndex;
use crate::domain::view::TypeRef;

/// Iterator over a type's superclass chain, nearest first, excluding the type itself.
pub struct SupertypeChain<'a> {
    index: &'a DescriptorIndex,
    next: Option<TypeId>,
    remaining: usize,
}

impl<'a> Iterator for SupertypeChain<'a> {
    type Item = TypeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index.type_ref(self.next?);
        self.next = current.descriptor().super_type();
        Some(current)
    }
}

impl<'a> TypeRef<'a> {
    pub fn supertypes(&self) -> SupertypeChain<'a> {
        SupertypeChain {
            index: self.index(),
            next: self.descriptor().super_type(),
            remaining: self.index().len(),
        }
    }

    /// True when `candidate` is this type or one of its superclasses.
    ///
    /// Read as "is `candidate` my type or a super type of mine": for `B extends A`,
    /// `B.is_type_or_super_type(A)` holds and `A.is_type_or_super_type(B)` does not.
    /// Interfaces are not consulted; see [`TypeRef::is_assignable_to`].
    pub fn is_type_or_super_type(&self, candidate: &TypeRef<'_>) -> bool {
        if !std::ptr::eq(self.index(), candidate.index()) {
            return false;
        }
        let target = candidate.id();
        self.id() == target || self.supertypes().any(|s| s.id() == target)
    }

    /// True when this type is `target` or reaches it through any chain of superclass and
    /// interface links.
    pub fn is_assignable_to(&self, target: &TypeRef<'_>) -> bool {
        if !std::ptr::eq(self.index(), target.index()) {
            return false;
        }
        let graph = self.index().hierarchy();
        let goal = petgraph::graph::NodeIndex::new(target.id().index());
        let mut bfs = Bfs::new(graph, petgraph::graph::NodeIndex::new(self.id().index()));
        while let Some(n) = bfs.next(graph) {
            if n == goal {
                return true;
            }
        }
        false
    }

    /// Every superclass and interface reachable from this type, breadth-first, excluding itself.
    pub fn all_supertypes(&self) -> Vec<TypeRef<'a>> {
        let index = self.index();
        let graph = index.hierarchy();
        let mut bfs = Bfs::new(graph, petgraph::graph::NodeIndex::new(self.id().index()));
        let mut out = Vec::new();
        while let Some(n) = bfs.next(graph) {
            let id = graph[n];
            if id != self.id() {
                out.push(index.type_ref(id));
            }
        }
        out
    }

    pub fn direct_subtypes(&self) -> Vec<TypeRef<'a>> {
        let index = self.index();
        index
            .direct_subtypes(self.id())
            .into_iter()
            .map(|id| index.type_ref(id))
            .collect()
    }

    /// Every type that extends or implements this one, directly or transitively, sorted by id.
    pub fn all_subtypes(&self) -> Vec<TypeRef<'a>> {
        let index = self.index();
        let graph = index.hierarchy();
        let reversed = Reversed(graph);
        let mut bfs = Bfs::new(reversed, petgraph::graph::NodeIndex::new(self.id().index()));
        let mut ids = Vec::new();
        while let Some(n) = bfs.next(reversed) {
            let id = graph[n];
            if id != self.id() {
                ids.push(id);
            }
        }
        ids.sort();
        ids.into_iter().map(|id| index.type_ref(id)).collect()
    }

    /// Topmost superclass that is still a scanned type (the type itself for roots).
    pub fn scanned_root(&self) -> TypeRef<'a> {
        self.supertypes()
            .take_while(|t| t.descriptor().is_scanned())
            .last()
            .unwrap_or(*self)
    }
}
