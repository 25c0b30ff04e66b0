use serde::Serialize;

/// Hierarchy edge kind, directed subtype → supertype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyEdge {
    /// Superclass link (`class B extends A`). At most one per type.
    Extends,
    /// Interface link (`implements I`, or `interface J extends I`).
    Implements,
}
