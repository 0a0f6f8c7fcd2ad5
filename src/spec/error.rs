//! Error types for specification registration and resolution

use thiserror::Error;

/// Errors that can occur in the namespace registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    /// A `(namespace, type name)` pair was registered twice
    #[error("type '{namespace}/{neurodata_type}' is already registered")]
    DuplicateType {
        namespace: String,
        neurodata_type: String,
    },

    /// No specification exists for the requested type
    #[error("unknown type '{namespace}/{neurodata_type}'")]
    UnknownType {
        namespace: String,
        neurodata_type: String,
    },

    /// The parent-type chain loops back on itself
    #[error("cyclic inheritance in namespace '{namespace}': {chain:?}")]
    CyclicInheritance {
        namespace: String,
        chain: Vec<String>,
    },
}
