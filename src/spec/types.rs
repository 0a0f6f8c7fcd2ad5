//! Specification model types
//!
//! These are plain serde-derived data types; the registry in
//! `registry.rs` owns indexing, inheritance flattening, and caching.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// Whether a type maps to a group node or a single-array dataset node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Group,
    Dataset,
}

/// Expected element type of an attribute or dataset payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Text,
    Int,
    Float,
    Bool,
    #[default]
    Any,
}

impl DataType {
    /// Check a payload against this type; arrays are checked element-wise,
    /// and integers are accepted where floats are expected
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.matches(item)),
            _ => match self {
                DataType::Any => true,
                DataType::Text => value.is_string(),
                DataType::Int => value.is_i64() || value.is_u64(),
                DataType::Float => value.is_number(),
                DataType::Bool => value.is_boolean(),
            },
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Text => write!(f, "text"),
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Bool => write!(f, "bool"),
            DataType::Any => write!(f, "any"),
        }
    }
}

/// Specification of one attribute on a typed node or dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub dtype: DataType,
    /// Fixed value written verbatim, never read from the container
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
    /// Default applied when the container leaves the field unset
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc: Option<String>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            dtype: DataType::Any,
            value: None,
            default: None,
            doc: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_dtype(mut self, dtype: DataType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Specification of one dataset child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub dtype: DataType,
    /// Expected shape; `None` entries allow any extent along that axis.
    /// A missing shape means scalar.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shape: Option<Vec<Option<usize>>>,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc: Option<String>,
}

impl DatasetSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            dtype: DataType::Any,
            shape: None,
            attributes: Vec::new(),
            doc: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_dtype(mut self, dtype: DataType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_shape(mut self, shape: Vec<Option<usize>>) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Check a payload against the declared shape
    pub fn shape_matches(&self, value: &Value) -> bool {
        match &self.shape {
            None => !value.is_array(),
            Some(dims) => shape_matches(dims, value),
        }
    }
}

fn shape_matches(dims: &[Option<usize>], value: &Value) -> bool {
    match dims.split_first() {
        None => !value.is_array(),
        Some((dim, rest)) => match value {
            Value::Array(items) => {
                if let Some(expected) = dim {
                    if items.len() != *expected {
                        return false;
                    }
                }
                items.iter().all(|item| shape_matches(rest, item))
            }
            _ => false,
        },
    }
}

/// Specification of one typed sub-group child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub target_type: String,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Specification of one link child and its target type constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub name: String,
    pub target_type: String,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl LinkSpec {
    pub fn new(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Specification of one type: its fields and optional parent type
///
/// The owning namespace is assigned at registration; a `TypeSpec` on its
/// own is namespace-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub neurodata_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
    /// Payload type for dataset-kinded (single-array) types
    #[serde(default)]
    pub dtype: DataType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shape: Option<Vec<Option<usize>>>,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

impl TypeSpec {
    pub fn new(neurodata_type: impl Into<String>) -> Self {
        Self {
            neurodata_type: neurodata_type.into(),
            parent_type: None,
            kind: NodeKind::Group,
            help: None,
            dtype: DataType::Any,
            shape: None,
            attributes: Vec::new(),
            datasets: Vec::new(),
            groups: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_type = Some(parent_type.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Declare this a single-array type with the given payload constraints
    pub fn dataset_kind(mut self, dtype: DataType, shape: Option<Vec<Option<usize>>>) -> Self {
        self.kind = NodeKind::Dataset;
        self.dtype = dtype;
        self.shape = shape;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetSpec) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn with_group(mut self, group: GroupSpec) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_link(mut self, link: LinkSpec) -> Self {
        self.links.push(link);
        self
    }
}

/// A named collection of type specifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            types: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_type(mut self, spec: TypeSpec) -> Self {
        self.types.push(spec);
        self
    }

    /// Import a namespace from YAML
    pub fn from_yaml(yaml_content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml_content)
    }

    /// Export a namespace to YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Import a namespace from JSON
    pub fn from_json(json_content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_content)
    }

    /// Export a namespace to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Export a namespace to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
