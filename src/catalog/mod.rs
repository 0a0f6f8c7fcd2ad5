//! Container capability trait and the type catalog
//!
//! The set of mappable container types is open: domain crates define
//! their own containers and register them here. A container exposes its
//! instance identity, its name, and field access by name; the catalog
//! binds the container's runtime type to a `(namespace, type name)` pair
//! and to a constructor used during reconstruction.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors that can occur in the type catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The container's runtime type (or spec identity) was never registered
    #[error("no registered container type for '{identity}'")]
    UnregisteredType { identity: String },

    /// A registered constructor rejected the assembled field values
    #[error("cannot construct '{name}': {message}")]
    Construction { name: String, message: String },
}

/// A typed domain object mappable to and from a builder tree
///
/// Implementations expose their fields by specification field name; the
/// mapper never sees the concrete type beyond this interface.
pub trait Container {
    /// Instance identity, used as the session-cache key during building
    fn id(&self) -> Uuid;

    /// Node name in the builder tree
    fn name(&self) -> &str;

    /// Field access by specification field name
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Runtime type identity, used for catalog dispatch
    fn as_any(&self) -> &dyn Any;
}

/// A single field value pulled off (or fed into) a container
#[derive(Clone)]
pub enum FieldValue {
    /// Attribute or dataset payload
    Value(Value),
    /// Composed or linked container
    Container(Rc<dyn Container>),
}

impl FieldValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(value) => Some(value),
            FieldValue::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&Rc<dyn Container>> {
        match self {
            FieldValue::Container(container) => Some(container),
            FieldValue::Value(_) => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldValue::Container(container) => {
                f.debug_tuple("Container").field(&container.name()).finish()
            }
        }
    }
}

/// Assembled field values handed to a registered constructor
#[derive(Debug)]
pub struct ContainerData {
    pub name: String,
    fields: HashMap<String, FieldValue>,
}

impl ContainerData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn insert_value(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), FieldValue::Value(value));
    }

    pub fn insert_container(&mut self, field: impl Into<String>, container: Rc<dyn Container>) {
        self.fields
            .insert(field.into(), FieldValue::Container(container));
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).and_then(FieldValue::as_value)
    }

    pub fn container(&self, field: &str) -> Option<Rc<dyn Container>> {
        self.fields
            .get(field)
            .and_then(FieldValue::as_container)
            .cloned()
    }

    fn mismatch(&self, field: &str, expected: &str) -> CatalogError {
        CatalogError::Construction {
            name: self.name.clone(),
            message: format!("missing or mistyped field '{field}' (expected {expected})"),
        }
    }

    pub fn expect_value(&self, field: &str) -> Result<&Value, CatalogError> {
        self.value(field).ok_or_else(|| self.mismatch(field, "value"))
    }

    pub fn expect_container(&self, field: &str) -> Result<Rc<dyn Container>, CatalogError> {
        self.container(field)
            .ok_or_else(|| self.mismatch(field, "container"))
    }

    pub fn expect_string(&self, field: &str) -> Result<String, CatalogError> {
        self.value(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(field, "string"))
    }

    pub fn expect_f64(&self, field: &str) -> Result<f64, CatalogError> {
        self.value(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.mismatch(field, "float"))
    }

    pub fn expect_i64(&self, field: &str) -> Result<i64, CatalogError> {
        self.value(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.mismatch(field, "int"))
    }

    pub fn expect_string_vec(&self, field: &str) -> Result<Vec<String>, CatalogError> {
        let items = self
            .value(field)
            .and_then(Value::as_array)
            .ok_or_else(|| self.mismatch(field, "string array"))?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.mismatch(field, "string array"))
    }

    pub fn expect_f64_vec(&self, field: &str) -> Result<Vec<f64>, CatalogError> {
        let items = self
            .value(field)
            .and_then(Value::as_array)
            .ok_or_else(|| self.mismatch(field, "float array"))?;
        items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.mismatch(field, "float array"))
    }

    pub fn expect_i64_vec(&self, field: &str) -> Result<Vec<i64>, CatalogError> {
        let items = self
            .value(field)
            .and_then(Value::as_array)
            .ok_or_else(|| self.mismatch(field, "int array"))?;
        items
            .iter()
            .map(Value::as_i64)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.mismatch(field, "int array"))
    }
}

/// Reconstruction function registered per type
pub type ConstructorFn =
    Box<dyn Fn(ContainerData) -> Result<Rc<dyn Container>, CatalogError> + Send + Sync>;

/// Bidirectional index between container runtime types and spec identities
///
/// Like the registry, the catalog is populated once and then shared
/// read-only across mapping sessions.
pub struct TypeCatalog {
    type_keys: HashMap<TypeId, (String, String)>,
    constructors: HashMap<(String, String), ConstructorFn>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self {
            type_keys: HashMap::new(),
            constructors: HashMap::new(),
        }
    }

    /// Bind a container type to a spec identity and a constructor
    ///
    /// Re-registering the same type replaces the previous binding.
    pub fn register<C: Container + 'static>(
        &mut self,
        namespace: impl Into<String>,
        neurodata_type: impl Into<String>,
        constructor: ConstructorFn,
    ) {
        let key = (namespace.into(), neurodata_type.into());
        debug!(
            namespace = %key.0,
            neurodata_type = %key.1,
            "registering container type"
        );
        self.type_keys.insert(TypeId::of::<C>(), key.clone());
        self.constructors.insert(key, constructor);
    }

    /// Spec identity of a container's runtime type
    pub fn type_key(&self, container: &dyn Container) -> Result<&(String, String), CatalogError> {
        self.type_keys
            .get(&container.as_any().type_id())
            .ok_or_else(|| CatalogError::UnregisteredType {
                identity: container.name().to_string(),
            })
    }

    /// Constructor registered for a spec identity
    pub fn constructor_for(
        &self,
        namespace: &str,
        neurodata_type: &str,
    ) -> Result<&ConstructorFn, CatalogError> {
        self.constructors
            .get(&(namespace.to_string(), neurodata_type.to_string()))
            .ok_or_else(|| CatalogError::UnregisteredType {
                identity: format!("{namespace}/{neurodata_type}"),
            })
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
