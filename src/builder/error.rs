//! Error types for builder-tree operations

use thiserror::Error;

/// Errors that can occur when manipulating a builder tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    /// A child with the same name already exists under the parent
    #[error("name '{name}' already exists under '{parent}'")]
    DuplicateName { name: String, parent: String },

    /// A link's target path could not be resolved from the tree root
    #[error("link '{name}' does not resolve: no node at '{target_path}'")]
    UnresolvedLink { name: String, target_path: String },

    /// A path lookup found no node
    #[error("no node at path '{path}'")]
    NoSuchPath { path: String },
}
