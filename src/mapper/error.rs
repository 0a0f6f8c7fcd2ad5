//! Error types for mapping operations

use thiserror::Error;

use crate::builder::BuilderError;
use crate::catalog::CatalogError;
use crate::spec::SpecError;

/// Errors that can occur while mapping containers to or from builder trees
///
/// Every error is scoped to the object being mapped and carries the field
/// name, builder path, or type name at fault; already-completed session
/// cache entries stay valid.
#[derive(Error, Debug)]
pub enum MapperError {
    /// A spec-required field was absent from the container or tree
    #[error("missing required field '{field}' at '{path}'")]
    MissingRequiredField { field: String, path: String },

    /// A field value was incompatible with the spec's dtype or shape
    #[error("type mismatch for field '{field}' at '{path}': expected {expected}")]
    TypeMismatch {
        field: String,
        path: String,
        expected: String,
    },

    /// A link's target could not be resolved
    #[error("unresolved link '{link}': cannot resolve target '{target}'")]
    UnresolvedLink { link: String, target: String },

    /// Several children matched a sub-group field's target type
    #[error("ambiguous sub-group field '{field}' at '{path}': candidates {candidates:?}")]
    AmbiguousSubGroup {
        field: String,
        path: String,
        candidates: Vec<String>,
    },

    /// Following links re-entered a node still under construction
    #[error("link cycle detected through '{path}'")]
    LinkCycle { path: String },

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type for mapping operations
pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapperError::MissingRequiredField {
            field: "description".to_string(),
            path: "/elec1".to_string(),
        };
        assert!(err.to_string().contains("description"));
        assert!(err.to_string().contains("/elec1"));

        let err = MapperError::UnresolvedLink {
            link: "electrode_group".to_string(),
            target: "elec1".to_string(),
        };
        assert!(err.to_string().contains("electrode_group"));
    }
}
