use crate::domain::scan::ScanIndex;
use anyhow::Result;

/// Scan index source port (implemented by Infrastructure)
pub trait ScanSource {
    fn load(&self) -> Result<ScanIndex>;
}

/// How a type name outside the scanned set may still be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Built-in value type (`int`, `void`, ...).
    Primitive,
    /// Array of `component`; the component name is resolved in turn.
    Array { component: String },
    /// Library type accepted by name only, linked as an opaque descriptor.
    Library,
}

/// Fallback resolution port for names the scan does not declare
pub trait TypeResolver: Send + Sync {
    /// `None` means the name cannot be linked.
    fn resolve(&self, type_name: &str) -> Option<Resolution>;

    fn name(&self) -> &str;
}
