//! Fallback type resolvers
//!
//! Decide which type names outside the scanned set may still be linked, and as what.

mod closed;
mod jvm;

pub use closed::ClosedWorldResolver;
pub use jvm::JvmTypeResolver;

use crate::domain::ports::Resolution;
use regex::Regex;
use std::sync::OnceLock;

pub const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

fn array_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)((?:\[\])+)$").expect("array suffix regex"))
}

/// `int` → primitive, `X[]` → array of `X` (one dimension peeled at a time).
pub(crate) fn primitive_or_array(type_name: &str) -> Option<Resolution> {
    if PRIMITIVES.contains(&type_name) {
        return Some(Resolution::Primitive);
    }
    let caps = array_regex().captures(type_name)?;
    let dims = caps.get(2)?.as_str().len() / 2;
    let base = caps.get(1)?.as_str();
    Some(Resolution::Array {
        component: format!("{base}{}", "[]".repeat(dims - 1)),
    })
}
