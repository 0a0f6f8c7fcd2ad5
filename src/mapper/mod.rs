//! Bidirectional, spec-driven translation between containers and builder trees
//!
//! The mapper walks a resolved type specification rather than the
//! container or tree representation, so field population order is the
//! spec's declared order (inherited then overridden) and reconstruction
//! is deterministic regardless of how children were stored.
//!
//! Link references are resolved out of band: a build session keeps an
//! identity-to-path cache and a pending-link worklist, so a container may
//! be built before or after the container it links to, as long as both
//! land in the same session. A construct session keeps a path-to-instance
//! cache so containers sharing a link target share one reconstructed
//! instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use neurodata_mapper::{NamespaceRegistry, ObjectMapper, TypeCatalog};
//!
//! let mapper = ObjectMapper::new(&registry, &catalog);
//!
//! let mut session = mapper.begin_build();
//! session.build(&device)?;
//! session.build(&electrode_group)?;
//! let tree = session.finish()?;
//!
//! let mut session = mapper.begin_construct(&tree);
//! let rebuilt = session.construct("/elec1")?;
//! ```

mod build;
mod construct;
mod error;

pub use build::BuildSession;
pub use construct::ConstructSession;
pub use error::{MapperError, MapperResult};

use crate::builder::GroupBuilder;
use crate::catalog::TypeCatalog;
use crate::spec::NamespaceRegistry;

/// The translation engine: pairs a namespace registry with a type catalog
///
/// Stateless between calls; all per-call state lives in the sessions it
/// hands out, so concurrent sessions may share one mapper read-only.
pub struct ObjectMapper<'a> {
    registry: &'a NamespaceRegistry,
    catalog: &'a TypeCatalog,
}

impl<'a> ObjectMapper<'a> {
    pub fn new(registry: &'a NamespaceRegistry, catalog: &'a TypeCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Start a container-to-tree session with an empty root group
    pub fn begin_build(&self) -> BuildSession<'a> {
        BuildSession::new(self.registry, self.catalog)
    }

    /// Start a tree-to-container session over a completed tree
    pub fn begin_construct<'t>(&self, root: &'t GroupBuilder) -> ConstructSession<'a, 't> {
        ConstructSession::new(self.registry, self.catalog, root)
    }
}

/// Join a parent path and a child name into an absolute path
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "dev1"), "/dev1");
        assert_eq!(join_path("/elec1", "device"), "/elec1/device");
    }
}
