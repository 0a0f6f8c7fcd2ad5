//! Validation of completed builder trees
//!
//! Trees built by a [`crate::mapper::BuildSession`] are link-complete by
//! construction; trees arriving from the storage collaborator are not
//! guaranteed to be. This module checks the link structure of a tree:
//! every link must resolve by path from the root, and the link graph must
//! be acyclic so reconstruction can terminate.

pub mod links;

pub use links::{DanglingLink, LinkValidationResult, LinkValidator};
