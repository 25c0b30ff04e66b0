use super::primitive_or_array;
use crate::domain::ports::{Resolution, TypeResolver};

/// Closed-world resolver
///
/// Only primitives and arrays are linked without a scan record; every class or interface must
/// be part of the scan.
pub struct ClosedWorldResolver;

impl TypeResolver for ClosedWorldResolver {
    fn resolve(&self, type_name: &str) -> Option<Resolution> {
        primitive_or_array(type_name)
    }

    fn name(&self) -> &str {
        "closed-world"
    }
}
