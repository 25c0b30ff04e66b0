//! Construction-time errors. Queries over a built index never fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A referenced type name is neither scanned nor accepted by the fallback resolver, or it
    /// names a scanned type that was itself rejected.
    #[error("unresolved type `{type_name}` referenced from `{referenced_from}`")]
    UnresolvedTypeDescriptor {
        type_name: String,
        referenced_from: String,
    },

    /// The scan produced an incomplete or inconsistent record.
    #[error("malformed index entry at {location}: {reason}")]
    MalformedIndexEntry { location: String, reason: String },

    /// A type appears in its own supertype/interface closure.
    #[error("cyclic inheritance involving `{type_name}`")]
    CyclicInheritance { type_name: String },
}

impl DescriptorError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIndexEntry {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(
        type_name: impl Into<String>,
        referenced_from: impl Into<String>,
    ) -> Self {
        Self::UnresolvedTypeDescriptor {
            type_name: type_name.into(),
            referenced_from: referenced_from.into(),
        }
    }

    /// Short stable tag, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedTypeDescriptor { .. } => "unresolved_type_descriptor",
            Self::MalformedIndexEntry { .. } => "malformed_index_entry",
            Self::CyclicInheritance { .. } => "cyclic_inheritance",
        }
    }
}

/// Strict build failure: every error found while building, in discovery order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "descriptor build failed with {} error(s); first: {}",
    .errors.len(),
    first_message(.errors)
)]
pub struct BuildError {
    pub errors: Vec<DescriptorError>,
}

fn first_message(errors: &[DescriptorError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "<none>".to_string())
}
