//! Builder node types: groups, datasets, and links

use std::collections::HashMap;

use serde_json::Value;

use super::error::BuilderError;

/// A node in a builder tree
///
/// Equality is structural: names, attributes, dataset payloads, and link
/// target paths must match. Child and attribute insertion order is
/// irrelevant; element order inside a dataset payload is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum Builder {
    Group(GroupBuilder),
    Dataset(DatasetBuilder),
    Link(LinkBuilder),
}

impl Builder {
    /// Name of the node
    pub fn name(&self) -> &str {
        match self {
            Builder::Group(g) => g.name(),
            Builder::Dataset(d) => d.name(),
            Builder::Link(l) => l.name(),
        }
    }

    /// Attribute lookup for typed nodes; links carry no attributes
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        match self {
            Builder::Group(g) => g.attribute(key),
            Builder::Dataset(d) => d.attribute(key),
            Builder::Link(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupBuilder> {
        match self {
            Builder::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_dataset(&self) -> Option<&DatasetBuilder> {
        match self {
            Builder::Dataset(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkBuilder> {
        match self {
            Builder::Link(l) => Some(l),
            _ => None,
        }
    }
}

/// A group node owning named children
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBuilder {
    name: String,
    attributes: HashMap<String, Value>,
    children: HashMap<String, Builder>,
}

impl GroupBuilder {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Set an attribute, chainable
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Replace all attributes, chainable
    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over direct children in no particular order
    pub fn children(&self) -> impl Iterator<Item = &Builder> {
        self.children.values()
    }

    /// Insert a fully built node as a child
    pub fn insert(&mut self, node: Builder) -> Result<(), BuilderError> {
        let name = node.name().to_string();
        if self.children.contains_key(&name) {
            return Err(BuilderError::DuplicateName {
                name,
                parent: self.name.clone(),
            });
        }
        self.children.insert(name, node);
        Ok(())
    }

    /// Create an empty child group
    pub fn create_group(&mut self, name: impl Into<String>) -> Result<&mut GroupBuilder, BuilderError> {
        let name = name.into();
        self.insert(Builder::Group(GroupBuilder::new(name.clone())))?;
        match self.children.get_mut(&name) {
            Some(Builder::Group(g)) => Ok(g),
            _ => unreachable!("group was just inserted"),
        }
    }

    /// Store a dataset child
    ///
    /// Fails on a name collision; overwriting an existing dataset goes
    /// through [`GroupBuilder::replace_dataset`] only.
    pub fn set_dataset(
        &mut self,
        name: impl Into<String>,
        data: Value,
        attributes: HashMap<String, Value>,
    ) -> Result<&mut DatasetBuilder, BuilderError> {
        let name = name.into();
        let dataset = DatasetBuilder::new(name.clone(), data).with_attributes(attributes);
        self.insert(Builder::Dataset(dataset))?;
        match self.children.get_mut(&name) {
            Some(Builder::Dataset(d)) => Ok(d),
            _ => unreachable!("dataset was just inserted"),
        }
    }

    /// Replace an existing dataset (or store a new one) under `name`
    pub fn replace_dataset(
        &mut self,
        name: impl Into<String>,
        data: Value,
        attributes: HashMap<String, Value>,
    ) -> &mut DatasetBuilder {
        let name = name.into();
        let dataset = DatasetBuilder::new(name.clone(), data).with_attributes(attributes);
        self.children.insert(name.clone(), Builder::Dataset(dataset));
        match self.children.get_mut(&name) {
            Some(Builder::Dataset(d)) => d,
            _ => unreachable!("dataset was just inserted"),
        }
    }

    /// Store a link child referencing `target_path`
    ///
    /// The target does not need to exist yet; it must resolve by the time
    /// the tree is considered complete.
    pub fn set_link(
        &mut self,
        name: impl Into<String>,
        target_path: impl Into<String>,
    ) -> Result<&mut LinkBuilder, BuilderError> {
        let name = name.into();
        self.insert(Builder::Link(LinkBuilder::new(name.clone(), target_path)))?;
        match self.children.get_mut(&name) {
            Some(Builder::Link(l)) => Ok(l),
            _ => unreachable!("link was just inserted"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Builder> {
        self.children.get(name)
    }

    pub fn get_group(&self, name: &str) -> Option<&GroupBuilder> {
        self.children.get(name).and_then(Builder::as_group)
    }

    pub fn get_dataset(&self, name: &str) -> Option<&DatasetBuilder> {
        self.children.get(name).and_then(Builder::as_dataset)
    }

    pub fn get_link(&self, name: &str) -> Option<&LinkBuilder> {
        self.children.get(name).and_then(Builder::as_link)
    }

    pub fn get_group_mut(&mut self, name: &str) -> Option<&mut GroupBuilder> {
        match self.children.get_mut(name) {
            Some(Builder::Group(g)) => Some(g),
            _ => None,
        }
    }

    pub fn get_link_mut(&mut self, name: &str) -> Option<&mut LinkBuilder> {
        match self.children.get_mut(name) {
            Some(Builder::Link(l)) => Some(l),
            _ => None,
        }
    }

    /// Navigate an absolute, slash-separated path from this node
    ///
    /// `"/a/b"` and `"a/b"` are equivalent. Returns `None` for the empty
    /// path: paths identify descendants, not the root itself.
    pub fn get_by_path(&self, path: &str) -> Option<&Builder> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut node = self.children.get(first)?;
        for segment in segments {
            node = node.as_group()?.get(segment)?;
        }
        Some(node)
    }

    /// Mutable group navigation; the empty path resolves to this node
    pub fn get_group_mut_by_path(&mut self, path: &str) -> Option<&mut GroupBuilder> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.get_group_mut(segment)?;
        }
        Some(node)
    }

    /// Resolve the named link child against `root`
    pub fn resolve_link<'r>(
        &self,
        name: &str,
        root: &'r GroupBuilder,
    ) -> Result<&'r Builder, BuilderError> {
        let link = self.get_link(name).ok_or_else(|| BuilderError::NoSuchPath {
            path: format!("{}/{}", self.name, name),
        })?;
        root.get_by_path(link.target_path())
            .ok_or_else(|| BuilderError::UnresolvedLink {
                name: name.to_string(),
                target_path: link.target_path().to_string(),
            })
    }
}

/// A dataset node owning a payload and its attributes
///
/// The payload is a scalar, a fixed-shape array, or a ragged
/// array-of-arrays; element order is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBuilder {
    name: String,
    data: Value,
    attributes: HashMap<String, Value>,
}

impl DatasetBuilder {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }
}

/// A link node: a named, non-owning reference to another node by path
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBuilder {
    name: String,
    target_path: String,
}

impl LinkBuilder {
    pub fn new(name: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_path: target_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn set_target_path(&mut self, target_path: impl Into<String>) {
        self.target_path = target_path.into();
    }
}
