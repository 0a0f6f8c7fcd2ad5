//! Build path: container graph to builder tree

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::builder::{Builder, BuilderError, DatasetBuilder, GroupBuilder};
use crate::catalog::{Container, FieldValue, TypeCatalog};
use crate::spec::{NamespaceRegistry, NodeKind, ResolvedSpec};

use super::error::{MapperError, MapperResult};
use super::join_path;

/// A link whose target container had not been built when the link field
/// was encountered; patched in at [`BuildSession::finish`]
struct PendingLink {
    parent_path: String,
    link_name: String,
    target_id: Uuid,
    target_name: String,
}

/// Per-object state accumulated during one `build` call and committed to
/// the session only after the object lands in the tree
#[derive(Default)]
struct Staged {
    built: HashMap<Uuid, String>,
    pending: Vec<PendingLink>,
}

/// One container-to-tree mapping session
///
/// Owns the output tree, an identity-to-path cache of everything built so
/// far, and the pending-link worklist. Sessions are single-use and never
/// shared between concurrent mapping calls.
pub struct BuildSession<'a> {
    registry: &'a NamespaceRegistry,
    catalog: &'a TypeCatalog,
    root: GroupBuilder,
    built: HashMap<Uuid, String>,
    pending: Vec<PendingLink>,
}

impl<'a> BuildSession<'a> {
    pub(crate) fn new(registry: &'a NamespaceRegistry, catalog: &'a TypeCatalog) -> Self {
        Self {
            registry,
            catalog,
            root: GroupBuilder::new("root"),
            built: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Builder path recorded for a container built earlier in this session
    pub fn path_of(&self, container: &dyn Container) -> Option<&str> {
        self.built.get(&container.id()).map(String::as_str)
    }

    /// Map one container (and its composed children) into the session tree
    ///
    /// Returns the builder path of the new node. A failure aborts this
    /// container only and discards everything staged for it, so the
    /// caches never refer to nodes that are not in the tree; nodes
    /// completed earlier in the session stay valid and the caller may
    /// keep building.
    pub fn build(&mut self, container: &Rc<dyn Container>) -> MapperResult<String> {
        let path = join_path("/", container.name());
        let mut staged = Staged::default();
        let node = self.build_node(container, &path, &mut staged)?;
        self.root.insert(node)?;
        self.built.insert(container.id(), path.clone());
        self.built.extend(staged.built);
        self.pending.extend(staged.pending);
        Ok(path)
    }

    /// Resolve all pending links and hand back the completed tree
    ///
    /// Any pending link whose target container was never built in this
    /// session fails with an unresolved-link error naming the link.
    pub fn finish(mut self) -> MapperResult<GroupBuilder> {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for link in pending {
            let target_path =
                self.built
                    .get(&link.target_id)
                    .ok_or_else(|| MapperError::UnresolvedLink {
                        link: link.link_name.clone(),
                        target: link.target_name.clone(),
                    })?;
            let parent = self
                .root
                .get_group_mut_by_path(&link.parent_path)
                .ok_or_else(|| BuilderError::NoSuchPath {
                    path: link.parent_path.clone(),
                })?;
            let slot = parent
                .get_link_mut(&link.link_name)
                .ok_or_else(|| BuilderError::NoSuchPath {
                    path: join_path(&link.parent_path, &link.link_name),
                })?;
            slot.set_target_path(target_path);
        }
        info!(
            objects = self.built.len(),
            deferred_links = count,
            "build session complete"
        );
        Ok(self.root)
    }

    fn build_node(
        &mut self,
        container: &Rc<dyn Container>,
        path: &str,
        staged: &mut Staged,
    ) -> MapperResult<Builder> {
        let (namespace, neurodata_type) = self.catalog.type_key(container.as_ref())?.clone();
        let spec = self.registry.resolve(&namespace, &neurodata_type)?;
        debug!(%path, %neurodata_type, "building node");

        let attributes = self.node_attributes(&spec, container.as_ref(), path)?;
        match spec.kind {
            NodeKind::Group => {
                let group = self.build_group(&spec, container, path, attributes, staged)?;
                Ok(Builder::Group(group))
            }
            NodeKind::Dataset => {
                let dataset = self.build_dataset(&spec, container.as_ref(), path, attributes)?;
                Ok(Builder::Dataset(dataset))
            }
        }
    }

    /// Typed-node attributes: the structural `neurodata_type` /
    /// `namespace` / `help` triple plus the spec's attribute fields
    fn node_attributes(
        &self,
        spec: &ResolvedSpec,
        container: &dyn Container,
        path: &str,
    ) -> MapperResult<HashMap<String, Value>> {
        let mut attributes = HashMap::new();
        attributes.insert("neurodata_type".to_string(), json!(spec.neurodata_type));
        attributes.insert("namespace".to_string(), json!(spec.namespace));
        // always present so storage-side consumers can rely on it
        attributes.insert(
            "help".to_string(),
            json!(spec.help.as_deref().unwrap_or_default()),
        );
        for attr in &spec.attributes {
            if let Some(value) = self.attribute_value(attr, container, path)? {
                attributes.insert(attr.name.clone(), value);
            }
        }
        Ok(attributes)
    }

    /// Resolve one attribute spec against a container: fixed value first,
    /// then the container field, then the default
    fn attribute_value(
        &self,
        attr: &crate::spec::AttributeSpec,
        container: &dyn Container,
        path: &str,
    ) -> MapperResult<Option<Value>> {
        if let Some(fixed) = &attr.value {
            return Ok(Some(fixed.clone()));
        }
        match container.field(&attr.name) {
            Some(FieldValue::Value(value)) => {
                if !attr.dtype.matches(&value) {
                    return Err(MapperError::TypeMismatch {
                        field: attr.name.clone(),
                        path: path.to_string(),
                        expected: attr.dtype.to_string(),
                    });
                }
                Ok(Some(value))
            }
            Some(FieldValue::Container(_)) => Err(MapperError::TypeMismatch {
                field: attr.name.clone(),
                path: path.to_string(),
                expected: attr.dtype.to_string(),
            }),
            None => {
                if let Some(default) = &attr.default {
                    Ok(Some(default.clone()))
                } else if attr.required {
                    Err(MapperError::MissingRequiredField {
                        field: attr.name.clone(),
                        path: path.to_string(),
                    })
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn build_group(
        &mut self,
        spec: &ResolvedSpec,
        container: &Rc<dyn Container>,
        path: &str,
        attributes: HashMap<String, Value>,
        staged: &mut Staged,
    ) -> MapperResult<GroupBuilder> {
        let mut group = GroupBuilder::new(container.name()).with_attributes(attributes);

        for dataset_spec in &spec.datasets {
            match container.field(&dataset_spec.name) {
                Some(FieldValue::Value(data)) => {
                    if !dataset_spec.dtype.matches(&data) || !dataset_spec.shape_matches(&data) {
                        return Err(MapperError::TypeMismatch {
                            field: dataset_spec.name.clone(),
                            path: path.to_string(),
                            expected: describe_dataset(dataset_spec),
                        });
                    }
                    let mut dataset_attributes = HashMap::new();
                    for attr in &dataset_spec.attributes {
                        if let Some(value) = self.attribute_value(attr, container.as_ref(), path)? {
                            dataset_attributes.insert(attr.name.clone(), value);
                        }
                    }
                    group.set_dataset(&dataset_spec.name, data, dataset_attributes)?;
                }
                Some(FieldValue::Container(_)) => {
                    return Err(MapperError::TypeMismatch {
                        field: dataset_spec.name.clone(),
                        path: path.to_string(),
                        expected: describe_dataset(dataset_spec),
                    });
                }
                None if dataset_spec.required => {
                    return Err(MapperError::MissingRequiredField {
                        field: dataset_spec.name.clone(),
                        path: path.to_string(),
                    });
                }
                None => {}
            }
        }

        for group_spec in &spec.groups {
            match container.field(&group_spec.name) {
                Some(FieldValue::Container(child)) => {
                    let child_path = join_path(path, child.name());
                    let node = self.build_node(&child, &child_path, staged)?;
                    group.insert(node)?;
                    staged.built.insert(child.id(), child_path);
                }
                Some(FieldValue::Value(_)) => {
                    return Err(MapperError::TypeMismatch {
                        field: group_spec.name.clone(),
                        path: path.to_string(),
                        expected: format!("container of type {}", group_spec.target_type),
                    });
                }
                None if group_spec.required => {
                    return Err(MapperError::MissingRequiredField {
                        field: group_spec.name.clone(),
                        path: path.to_string(),
                    });
                }
                None => {}
            }
        }

        for link_spec in &spec.links {
            match container.field(&link_spec.name) {
                Some(FieldValue::Container(target)) => {
                    let known = self
                        .built
                        .get(&target.id())
                        .or_else(|| staged.built.get(&target.id()));
                    if let Some(target_path) = known {
                        group.set_link(&link_spec.name, target_path)?;
                    } else {
                        // placeholder, patched once the target is built
                        group.set_link(&link_spec.name, "")?;
                        staged.pending.push(PendingLink {
                            parent_path: path.to_string(),
                            link_name: link_spec.name.clone(),
                            target_id: target.id(),
                            target_name: target.name().to_string(),
                        });
                    }
                }
                Some(FieldValue::Value(_)) => {
                    return Err(MapperError::TypeMismatch {
                        field: link_spec.name.clone(),
                        path: path.to_string(),
                        expected: format!("container of type {}", link_spec.target_type),
                    });
                }
                None if link_spec.required => {
                    return Err(MapperError::MissingRequiredField {
                        field: link_spec.name.clone(),
                        path: path.to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(group)
    }

    /// Dataset-kinded (single-array) types: the payload comes from the
    /// container's `data` field, checked against the type's own constraints
    fn build_dataset(
        &self,
        spec: &ResolvedSpec,
        container: &dyn Container,
        path: &str,
        attributes: HashMap<String, Value>,
    ) -> MapperResult<DatasetBuilder> {
        let data = match container.field("data") {
            Some(FieldValue::Value(data)) => data,
            Some(FieldValue::Container(_)) => {
                return Err(MapperError::TypeMismatch {
                    field: "data".to_string(),
                    path: path.to_string(),
                    expected: spec.dtype.to_string(),
                });
            }
            None => {
                return Err(MapperError::MissingRequiredField {
                    field: "data".to_string(),
                    path: path.to_string(),
                });
            }
        };
        if !spec.dtype.matches(&data) || !payload_shape_matches(spec.shape.as_deref(), &data) {
            return Err(MapperError::TypeMismatch {
                field: "data".to_string(),
                path: path.to_string(),
                expected: spec.dtype.to_string(),
            });
        }
        Ok(DatasetBuilder::new(container.name(), data).with_attributes(attributes))
    }
}

fn payload_shape_matches(shape: Option<&[Option<usize>]>, value: &Value) -> bool {
    // reuse the dataset-spec shape semantics: no declared shape means scalar
    let mut probe = crate::spec::DatasetSpec::new("data");
    probe.shape = shape.map(<[Option<usize>]>::to_vec);
    probe.shape_matches(value)
}

fn describe_dataset(spec: &crate::spec::DatasetSpec) -> String {
    match &spec.shape {
        Some(shape) => format!("{} with shape {shape:?}", spec.dtype),
        None => format!("scalar {}", spec.dtype),
    }
}
