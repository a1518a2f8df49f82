//! Unresolved schema sources.
//!
//! A [`SchemaSource`] is what a loader produces from one schema file: named
//! definitions whose properties still refer to each other by name, plus the
//! resource keys served by those definitions. The registry builder turns
//! sources into linked [`Model`](super::Model)s.

use indexmap::IndexMap;
use std::path::PathBuf;

use super::key::ResourceTypeKey;
use super::model::PropertyType;

/// A property as declared in a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySchema {
    pub property_type: PropertyType,
    /// Name of the definition describing an object value.
    pub reference: Option<String>,
    /// Name of the definition describing array elements.
    pub items: Option<String>,
    pub description: Option<String>,
}

impl PropertySchema {
    /// A scalar property.
    pub fn scalar(property_type: PropertyType) -> Self {
        Self {
            property_type,
            reference: None,
            items: None,
            description: None,
        }
    }

    /// A property whose value is described by another definition.
    pub fn reference(definition: impl Into<String>) -> Self {
        Self {
            reference: Some(definition.into()),
            ..Self::scalar(PropertyType::Object)
        }
    }

    /// An array whose elements are described by another definition.
    pub fn array_of(definition: impl Into<String>) -> Self {
        Self {
            items: Some(definition.into()),
            ..Self::scalar(PropertyType::Array)
        }
    }

    /// An array of scalars or free-form values.
    pub fn array() -> Self {
        Self::scalar(PropertyType::Array)
    }

    /// A free-form object (e.g. `map[string]string`).
    pub fn free_form() -> Self {
        Self::scalar(PropertyType::Object)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named definition in a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// `Object` for structured types; anything else makes this a scalar alias
    /// such as `Quantity` or `Time`.
    pub definition_type: PropertyType,
    pub description: Option<String>,
    pub properties: IndexMap<String, PropertySchema>,
    pub open: bool,
    pub embedded_resource: bool,
}

impl Definition {
    /// An object definition with no properties yet.
    pub fn object() -> Self {
        Self {
            definition_type: PropertyType::Object,
            description: None,
            properties: IndexMap::new(),
            open: false,
            embedded_resource: false,
        }
    }

    /// A definition that aliases a scalar type.
    pub fn scalar(definition_type: PropertyType) -> Self {
        Self {
            definition_type,
            ..Self::object()
        }
    }

    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Allow properties beyond the declared ones.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Mark values of this definition as complete, self-describing resources.
    pub fn embedded_resource(mut self) -> Self {
        self.embedded_resource = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_object(&self) -> bool {
        self.definition_type == PropertyType::Object
    }
}

/// One versioned set of schema definitions.
#[derive(Debug, Clone, Default)]
pub struct SchemaSource {
    /// Schema-source version, e.g. `v1.29.0`.
    pub version: String,
    /// File the source was loaded from.
    pub origin: Option<PathBuf>,
    pub definitions: IndexMap<String, Definition>,
    /// Resource keys and the definitions that describe them.
    pub resources: Vec<(ResourceTypeKey, String)>,
}

impl SchemaSource {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn definition(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.add_definition(name, definition);
        self
    }

    pub fn resource(mut self, key: ResourceTypeKey, definition: impl Into<String>) -> Self {
        self.add_resource(key, definition);
        self
    }

    pub fn add_definition(&mut self, name: impl Into<String>, definition: Definition) {
        self.definitions.insert(name.into(), definition);
    }

    pub fn add_resource(&mut self, key: ResourceTypeKey, definition: impl Into<String>) {
        self.resources.push((key, definition.into()));
    }

    /// Parsed version used to order sources; unparseable versions rank lowest.
    ///
    /// Full semver (`v1.29.0`, `1.30.0-rc.1`) is used as is. Otherwise the
    /// trailing `MAJOR[.MINOR[.PATCH]]` run is taken and padded with zeros,
    /// so `v1.30` and a file stem like `kubernetes-v1.29` still order.
    pub fn precedence(&self) -> Option<semver::Version> {
        let version = self.version.trim();
        let stripped = version.strip_prefix('v').unwrap_or(version);
        if let Ok(parsed) = semver::Version::parse(stripped) {
            return Some(parsed);
        }
        trailing_version(version)
    }
}

fn trailing_version(version: &str) -> Option<semver::Version> {
    let start = version
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, _)| i)?;
    let run = version[start..].trim_matches('.');

    let parts = run
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match parts.as_slice() {
        [major] => Some(semver::Version::new(*major, 0, 0)),
        [major, minor] => Some(semver::Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(semver::Version::new(*major, *minor, *patch)),
        _ => None,
    }
}
