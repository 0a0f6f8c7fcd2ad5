//! Generic builder-tree model
//!
//! A builder tree is the hierarchical, self-describing representation that
//! sits between typed containers and the storage collaborator:
//! - `GroupBuilder` owns named children (groups, datasets, links)
//! - `DatasetBuilder` owns a payload plus its own attributes
//! - `LinkBuilder` holds a non-owning, path-based reference to another node
//!
//! The tree carries no type-specific knowledge; typed nodes are identified
//! by their `neurodata_type` / `namespace` attributes.

mod error;
mod tree;

pub use error::BuilderError;
pub use tree::{Builder, DatasetBuilder, GroupBuilder, LinkBuilder};
