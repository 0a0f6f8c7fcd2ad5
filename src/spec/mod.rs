//! Type specifications and the namespace registry
//!
//! A namespace is a named collection of type specifications. Each
//! specification declares the legal shape of one typed node: its
//! attributes, datasets, sub-groups, links, and an optional parent type
//! for single inheritance. The registry indexes specifications by
//! `(namespace, type name)` and serves fully flattened specs with
//! inherited fields merged in declaration order.

mod error;
mod registry;
mod types;

pub use error::SpecError;
pub use registry::{NamespaceRegistry, ResolvedSpec};
pub use types::{
    AttributeSpec, DataType, DatasetSpec, GroupSpec, LinkSpec, Namespace, NodeKind, TypeSpec,
};
