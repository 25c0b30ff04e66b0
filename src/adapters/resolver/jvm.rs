use super::primitive_or_array;
use crate::domain::ports::{Resolution, TypeResolver};
use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_LIBRARY_PREFIXES: [&str; 6] =
    ["java.", "javax.", "jakarta.", "kotlin.", "jdk.", "sun."];

fn qualified_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)+$")
            .expect("qualified name regex")
    })
}

/// JVM platform resolver
///
/// Links primitives, arrays, and well-formed qualified names under the platform packages (plus
/// any extra prefixes) as opaque library types.
pub struct JvmTypeResolver {
    library_prefixes: Vec<String>,
}

impl JvmTypeResolver {
    pub fn new() -> Self {
        Self {
            library_prefixes: DEFAULT_LIBRARY_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Adds package prefixes (`org.slf4j` or `org.slf4j.`) treated as library code.
    pub fn with_extra_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for prefix in prefixes {
            let prefix = prefix.as_ref().trim();
            if prefix.is_empty() {
                continue;
            }
            let prefix = if prefix.ends_with('.') {
                prefix.to_string()
            } else {
                format!("{prefix}.")
            };
            if !self.library_prefixes.contains(&prefix) {
                self.library_prefixes.push(prefix);
            }
        }
        self
    }

    pub fn library_prefixes(&self) -> &[String] {
        &self.library_prefixes
    }
}

impl Default for JvmTypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver for JvmTypeResolver {
    fn resolve(&self, type_name: &str) -> Option<Resolution> {
        if let Some(resolution) = primitive_or_array(type_name) {
            return Some(resolution);
        }
        let is_library = self
            .library_prefixes
            .iter()
            .any(|p| type_name.starts_with(p.as_str()));
        (is_library && qualified_name_regex().is_match(type_name)).then_some(Resolution::Library)
    }

    fn name(&self) -> &str {
        "jvm"
    }
}
