//! descriptor-index: classloading-free type and method descriptors built from static scans.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;

pub use domain::builder::{BuildReport, DescriptorBuilder};
pub use domain::descriptor::{MethodDescriptor, TypeDescriptor, TypeId, TypeKind};
pub use domain::entity::EntityModel;
pub use domain::error::{BuildError, DescriptorError};
pub use domain::index::DescriptorIndex;
pub use domain::view::{MethodRef, TypeRef};
