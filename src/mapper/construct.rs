//! Construct path: builder tree back to containers

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::builder::{Builder, DatasetBuilder, GroupBuilder};
use crate::catalog::{Container, ContainerData, TypeCatalog};
use crate::spec::NamespaceRegistry;

use super::error::{MapperError, MapperResult};
use super::join_path;

/// One tree-to-container mapping session
///
/// The path-to-instance cache guarantees shared-link integrity: every
/// builder path reconstructs at most once, so two containers linking to
/// the same target end up holding the same instance.
pub struct ConstructSession<'a, 't> {
    registry: &'a NamespaceRegistry,
    catalog: &'a TypeCatalog,
    root: &'t GroupBuilder,
    constructed: HashMap<String, Rc<dyn Container>>,
    in_progress: HashSet<String>,
}

impl<'a, 't> ConstructSession<'a, 't> {
    pub(crate) fn new(
        registry: &'a NamespaceRegistry,
        catalog: &'a TypeCatalog,
        root: &'t GroupBuilder,
    ) -> Self {
        Self {
            registry,
            catalog,
            root,
            constructed: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Reconstruct the container at an absolute builder path
    ///
    /// Already-constructed paths return the cached instance. Link targets
    /// are constructed recursively; re-entering a path still under
    /// construction is a true link cycle and fails.
    pub fn construct(&mut self, path: &str) -> MapperResult<Rc<dyn Container>> {
        if let Some(container) = self.constructed.get(path) {
            return Ok(container.clone());
        }
        if !self.in_progress.insert(path.to_string()) {
            return Err(MapperError::LinkCycle {
                path: path.to_string(),
            });
        }
        let result = self.construct_inner(path);
        self.in_progress.remove(path);
        let container = result?;
        self.constructed
            .insert(path.to_string(), container.clone());
        Ok(container)
    }

    fn construct_inner(&mut self, path: &str) -> MapperResult<Rc<dyn Container>> {
        let node = self
            .root
            .get_by_path(path)
            .ok_or_else(|| MapperError::UnresolvedLink {
                link: path.to_string(),
                target: path.to_string(),
            })?;
        debug!(%path, "constructing container");
        match node {
            Builder::Group(group) => self.construct_group(group, path),
            Builder::Dataset(dataset) => self.construct_dataset(dataset, path),
            // a link path stands in for its target
            Builder::Link(link) => self.construct(link.target_path()),
        }
    }

    /// Spec identity off a node's structural attributes
    fn spec_identity(
        &self,
        attribute: impl Fn(&str) -> Option<Value>,
        path: &str,
    ) -> MapperResult<(String, String)> {
        let neurodata_type = attribute("neurodata_type")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| MapperError::MissingRequiredField {
                field: "neurodata_type".to_string(),
                path: path.to_string(),
            })?;
        let namespace = attribute("namespace")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| MapperError::MissingRequiredField {
                field: "namespace".to_string(),
                path: path.to_string(),
            })?;
        Ok((namespace, neurodata_type))
    }

    /// Populate attribute fields in spec order, applying defaults where
    /// the tree omits them
    fn populate_attributes(
        &self,
        spec_attributes: &[crate::spec::AttributeSpec],
        attribute: impl Fn(&str) -> Option<Value>,
        data: &mut ContainerData,
        path: &str,
    ) -> MapperResult<()> {
        for attr in spec_attributes {
            if attr.value.is_some() {
                // fixed constants are spec artifacts, not container fields
                continue;
            }
            if let Some(value) = attribute(&attr.name) {
                data.insert_value(&attr.name, value);
            } else if let Some(default) = &attr.default {
                data.insert_value(&attr.name, default.clone());
            } else if attr.required {
                return Err(MapperError::MissingRequiredField {
                    field: attr.name.clone(),
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }

    fn construct_group(
        &mut self,
        group: &'t GroupBuilder,
        path: &str,
    ) -> MapperResult<Rc<dyn Container>> {
        let (namespace, neurodata_type) =
            self.spec_identity(|key| group.attribute(key).cloned(), path)?;
        let spec = self.registry.resolve(&namespace, &neurodata_type)?;
        let constructor = self.catalog.constructor_for(&namespace, &neurodata_type)?;

        let mut data = ContainerData::new(group.name());
        self.populate_attributes(
            &spec.attributes,
            |key| group.attribute(key).cloned(),
            &mut data,
            path,
        )?;

        for dataset_spec in &spec.datasets {
            match group.get_dataset(&dataset_spec.name) {
                Some(dataset) => {
                    data.insert_value(&dataset_spec.name, dataset.data().clone());
                    self.populate_attributes(
                        &dataset_spec.attributes,
                        |key| dataset.attribute(key).cloned(),
                        &mut data,
                        path,
                    )?;
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
            match self.find_typed_child(group, group_spec, path)? {
                Some(child_name) => {
                    let child_path = join_path(path, &child_name);
                    let child = self.construct(&child_path)?;
                    data.insert_container(&group_spec.name, child);
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
            match group.get_link(&link_spec.name) {
                Some(link) => {
                    let target_path = link.target_path();
                    if self.root.get_by_path(target_path).is_none() {
                        return Err(MapperError::UnresolvedLink {
                            link: link_spec.name.clone(),
                            target: target_path.to_string(),
                        });
                    }
                    let target = self.construct(target_path)?;
                    data.insert_container(&link_spec.name, target);
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

        Ok(constructor(data)?)
    }

    /// Locate the child group backing a sub-group field: by field name
    /// first, then by unique `neurodata_type` match (children are stored
    /// under the composed container's own name). More than one typed
    /// match is ambiguous and fails rather than picking one.
    fn find_typed_child(
        &self,
        group: &GroupBuilder,
        group_spec: &crate::spec::GroupSpec,
        path: &str,
    ) -> MapperResult<Option<String>> {
        if group.get_group(&group_spec.name).is_some() {
            return Ok(Some(group_spec.name.clone()));
        }
        let mut matches: Vec<&str> = group
            .children()
            .filter_map(Builder::as_group)
            .filter(|child| {
                child
                    .attribute("neurodata_type")
                    .and_then(Value::as_str)
                    .is_some_and(|ty| ty == group_spec.target_type)
            })
            .map(GroupBuilder::name)
            .collect();
        matches.sort_unstable();
        match matches.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some((*only).to_string())),
            many => Err(MapperError::AmbiguousSubGroup {
                field: group_spec.name.clone(),
                path: path.to_string(),
                candidates: many.iter().map(|name| (*name).to_string()).collect(),
            }),
        }
    }

    fn construct_dataset(
        &mut self,
        dataset: &'t DatasetBuilder,
        path: &str,
    ) -> MapperResult<Rc<dyn Container>> {
        let (namespace, neurodata_type) =
            self.spec_identity(|key| dataset.attribute(key).cloned(), path)?;
        let spec = self.registry.resolve(&namespace, &neurodata_type)?;
        let constructor = self.catalog.constructor_for(&namespace, &neurodata_type)?;

        let mut data = ContainerData::new(dataset.name());
        data.insert_value("data", dataset.data().clone());
        self.populate_attributes(
            &spec.attributes,
            |key| dataset.attribute(key).cloned(),
            &mut data,
            path,
        )?;

        Ok(constructor(data)?)
    }
}
