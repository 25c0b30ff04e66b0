//! Annotation names and instances as captured by the scanner.
//!
//! The descriptor model stores annotations verbatim and never interprets their values; consumers
//! such as the entity reader pick the attributes they understand.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Qualified annotation name (e.g. `javax.persistence.Entity`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationName(String);

impl AnnotationName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment after the last `.`; the whole name when unqualified.
    pub fn local_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for AnnotationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets maps keyed by `AnnotationName` be queried with a plain `&str`.
impl Borrow<str> for AnnotationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnnotationName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One annotation occurrence: its name plus the attribute values the scanner recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationInstance {
    name: AnnotationName,
    values: BTreeMap<String, Value>,
}

impl AnnotationInstance {
    pub fn new(name: AnnotationName, values: BTreeMap<String, Value>) -> Self {
        Self { name, values }
    }

    pub fn name(&self) -> &AnnotationName {
        &self.name
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn value(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// Attribute value when it is a JSON string.
    pub fn str_value(&self, attribute: &str) -> Option<&str> {
        self.value(attribute).and_then(Value::as_str)
    }
}

/// Annotation name → instance. Ordered so dumps and comparisons are deterministic.
pub type AnnotationMap = BTreeMap<AnnotationName, AnnotationInstance>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_package() {
        assert_eq!(AnnotationName::new("javax.persistence.Entity").local_name(), "Entity");
        assert_eq!(AnnotationName::new("Marker").local_name(), "Marker");
    }

    #[test]
    fn str_value_ignores_non_strings() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), Value::from("Customer"));
        values.insert("length".to_string(), Value::from(12));
        let ann = AnnotationInstance::new("javax.persistence.Entity".into(), values);

        assert_eq!(ann.str_value("name"), Some("Customer"));
        assert_eq!(ann.str_value("length"), None);
        assert!(ann.value("missing").is_none());
    }
}
