//! Namespace registry: indexing, inheritance flattening, caching

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::error::SpecError;
use super::types::{
    AttributeSpec, DataType, DatasetSpec, GroupSpec, LinkSpec, Namespace, NodeKind, TypeSpec,
};

/// A fully flattened specification: the parent chain merged into one
/// ordered field list per kind
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpec {
    pub namespace: String,
    pub neurodata_type: String,
    pub kind: NodeKind,
    pub help: Option<String>,
    pub dtype: DataType,
    pub shape: Option<Vec<Option<usize>>>,
    pub attributes: Vec<AttributeSpec>,
    pub datasets: Vec<DatasetSpec>,
    pub groups: Vec<GroupSpec>,
    pub links: Vec<LinkSpec>,
}

trait Named {
    fn field_name(&self) -> &str;
}

impl Named for AttributeSpec {
    fn field_name(&self) -> &str {
        &self.name
    }
}

impl Named for DatasetSpec {
    fn field_name(&self) -> &str {
        &self.name
    }
}

impl Named for GroupSpec {
    fn field_name(&self) -> &str {
        &self.name
    }
}

impl Named for LinkSpec {
    fn field_name(&self) -> &str {
        &self.name
    }
}

/// Merge a descendant's fields into the accumulated list: a field with an
/// ancestor's name replaces it in place, everything else appends
fn merge_fields<T: Named + Clone>(base: &mut Vec<T>, overrides: &[T]) {
    for field in overrides {
        match base
            .iter()
            .position(|existing| existing.field_name() == field.field_name())
        {
            Some(index) => base[index] = field.clone(),
            None => base.push(field.clone()),
        }
    }
}

/// Registry of type specifications, indexed by `(namespace, type name)`
///
/// Read-mostly: registration requires exclusive access, resolution shares
/// `&self` and caches flattened specs behind a lock so concurrent mapping
/// sessions can share one registry read-only.
pub struct NamespaceRegistry {
    types: HashMap<(String, String), TypeSpec>,
    resolved: RwLock<HashMap<(String, String), Arc<ResolvedSpec>>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Ingest a namespace's type specifications
    ///
    /// Fails without registering anything if any `(namespace, type name)`
    /// pair is already present.
    pub fn register_namespace(&mut self, namespace: Namespace) -> Result<(), SpecError> {
        for spec in &namespace.types {
            let key = (namespace.name.clone(), spec.neurodata_type.clone());
            if self.types.contains_key(&key) {
                return Err(SpecError::DuplicateType {
                    namespace: key.0,
                    neurodata_type: key.1,
                });
            }
        }
        let count = namespace.types.len();
        for spec in namespace.types {
            debug!(
                namespace = %namespace.name,
                neurodata_type = %spec.neurodata_type,
                "registering type specification"
            );
            self.types
                .insert((namespace.name.clone(), spec.neurodata_type.clone()), spec);
        }
        info!(namespace = %namespace.name, count, "registered namespace");
        Ok(())
    }

    /// Whether a specification exists for the given type
    pub fn contains(&self, namespace: &str, neurodata_type: &str) -> bool {
        self.types
            .contains_key(&(namespace.to_string(), neurodata_type.to_string()))
    }

    /// Distinct namespace names, sorted
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .keys()
            .map(|(namespace, _)| namespace.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Type names registered under a namespace, sorted
    pub fn type_names(&self, namespace: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, ty)| ty.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Resolve the fully flattened specification for a type
    ///
    /// Walks the parent chain root-ancestor-first, merging each
    /// descendant's field lists with in-place replacement on name
    /// collisions. Flattened specs are computed once and cached.
    pub fn resolve(
        &self,
        namespace: &str,
        neurodata_type: &str,
    ) -> Result<Arc<ResolvedSpec>, SpecError> {
        let key = (namespace.to_string(), neurodata_type.to_string());
        if let Ok(cache) = self.resolved.read() {
            if let Some(resolved) = cache.get(&key) {
                return Ok(resolved.clone());
            }
        }

        let resolved = Arc::new(self.flatten(namespace, neurodata_type)?);
        if let Ok(mut cache) = self.resolved.write() {
            cache.insert(key, resolved.clone());
        }
        Ok(resolved)
    }

    fn lookup(&self, namespace: &str, neurodata_type: &str) -> Result<&TypeSpec, SpecError> {
        self.types
            .get(&(namespace.to_string(), neurodata_type.to_string()))
            .ok_or_else(|| SpecError::UnknownType {
                namespace: namespace.to_string(),
                neurodata_type: neurodata_type.to_string(),
            })
    }

    fn flatten(&self, namespace: &str, neurodata_type: &str) -> Result<ResolvedSpec, SpecError> {
        // collect the chain from the requested type up to the root ancestor
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(neurodata_type.to_string());
        while let Some(type_name) = current {
            if !seen.insert(type_name.clone()) {
                let mut cycle: Vec<String> =
                    chain.iter().map(|s: &&TypeSpec| s.neurodata_type.clone()).collect();
                cycle.push(type_name);
                return Err(SpecError::CyclicInheritance {
                    namespace: namespace.to_string(),
                    chain: cycle,
                });
            }
            let spec = self.lookup(namespace, &type_name)?;
            chain.push(spec);
            current = spec.parent_type.clone();
        }

        // apply root-ancestor-first so descendants override in place
        let mut resolved = ResolvedSpec {
            namespace: namespace.to_string(),
            neurodata_type: neurodata_type.to_string(),
            kind: NodeKind::Group,
            help: None,
            dtype: DataType::Any,
            shape: None,
            attributes: Vec::new(),
            datasets: Vec::new(),
            groups: Vec::new(),
            links: Vec::new(),
        };
        for spec in chain.iter().rev() {
            resolved.kind = spec.kind;
            if spec.help.is_some() {
                resolved.help = spec.help.clone();
            }
            if spec.dtype != DataType::Any {
                resolved.dtype = spec.dtype;
            }
            if spec.shape.is_some() {
                resolved.shape = spec.shape.clone();
            }
            merge_fields(&mut resolved.attributes, &spec.attributes);
            merge_fields(&mut resolved.datasets, &spec.datasets);
            merge_fields(&mut resolved.groups, &spec.groups);
            merge_fields(&mut resolved.links, &spec.links);
        }
        debug!(
            namespace,
            neurodata_type,
            depth = chain.len(),
            "flattened type specification"
        );
        Ok(resolved)
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
