//! Neurodata mapper - schema-driven object/tree mapping
//!
//! Provides the machinery to translate typed recording-metadata containers
//! into generic, self-describing builder trees and back:
//! - Builder-tree model (groups, datasets, links)
//! - Namespace registry of type specifications with single inheritance
//! - Type catalog binding container types to specs and constructors
//! - Bidirectional ObjectMapper with deferred link resolution
//! - Link-graph validation for trees arriving from storage
//!
//! The mapper is domain-agnostic: it hardcodes no container types and is
//! driven entirely by the registered specifications. It performs no I/O;
//! persistence of builder trees is the storage collaborator's concern.

pub mod builder;
pub mod catalog;
pub mod mapper;
pub mod spec;
pub mod validation;

// Re-export commonly used types
pub use builder::{Builder, BuilderError, DatasetBuilder, GroupBuilder, LinkBuilder};
pub use catalog::{CatalogError, Container, ContainerData, ConstructorFn, FieldValue, TypeCatalog};
pub use mapper::{BuildSession, ConstructSession, MapperError, MapperResult, ObjectMapper};
pub use spec::{
    AttributeSpec, DataType, DatasetSpec, GroupSpec, LinkSpec, Namespace, NamespaceRegistry,
    NodeKind, ResolvedSpec, SpecError, TypeSpec,
};
pub use validation::{DanglingLink, LinkValidationResult, LinkValidator};
