//! Resolved schema models.
//!
//! A [`Model`] describes the properties one object type allows. Models live
//! in a [`ModelRegistry`](super::ModelRegistry) arena and refer to each other
//! by [`ModelId`], so recursive schemas need no reference counting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a model within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub(crate) u32);

impl ModelId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    #[default]
    Unknown,
}

impl PropertyType {
    /// Parse an OpenAPI `type` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Unknown => "unknown",
        }
    }

    /// Whether values of this type are scalars.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A property declared by a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub property_type: PropertyType,
    /// Nested model for object-typed properties.
    pub model: Option<ModelId>,
    /// Element model for array-typed properties.
    pub items: Option<ModelId>,
    pub description: Option<String>,
}

impl PropertyDescriptor {
    /// The model that applies one level below this property.
    ///
    /// Objects descend into their nested model, arrays into their element
    /// model. Scalars have nothing to descend into.
    pub fn child_model(&self) -> Option<ModelId> {
        match self.property_type {
            PropertyType::Object => self.model,
            PropertyType::Array => self.items,
            _ => None,
        }
    }
}

/// Schema of one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Definition name, e.g. `io.k8s.api.core.v1.PodSpec`.
    pub name: String,
    pub description: Option<String>,
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Free-form object: additional properties are allowed, so no key is unexpected.
    pub open: bool,
    /// Holds a complete Kubernetes object with its own `apiVersion` and `kind`.
    pub embedded_resource: bool,
}

impl Model {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}
