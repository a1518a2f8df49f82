//! Loads schema sources from Kubernetes OpenAPI v2 (`swagger.json`) files.
//!
//! Each file becomes one [`SchemaSource`] whose version is taken from
//! `info.version`. Resource keys come from `x-kubernetes-group-version-kind`;
//! definitions named in the legacy `<version>.<Kind>` form are keyed as core
//! group resources when that extension is absent. Inline object schemas are
//! hoisted into synthetic definitions so every nested object has a name.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::key::ResourceTypeKey;
use super::model::PropertyType;
use super::registry::ModelRegistry;
use super::source::{Definition, PropertySchema, SchemaSource};

const REF_PREFIX: &str = "#/definitions/";
const RAW_EXTENSION_SUFFIX: &str = "runtime.RawExtension";

/// Error type for schema loading.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema document{}: {source}", origin_suffix(.origin))]
    Json {
        origin: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema path does not exist: {0}")]
    NotFound(PathBuf),
}

fn origin_suffix(origin: &Option<PathBuf>) -> String {
    origin
        .as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SwaggerDocument {
    info: Option<SwaggerInfo>,
    definitions: IndexMap<String, SchemaObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SwaggerInfo {
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SchemaObject {
    #[serde(rename = "type")]
    schema_type: Option<String>,
    description: Option<String>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
    properties: Option<IndexMap<String, SchemaObject>>,
    items: Option<Box<SchemaObject>>,
    #[serde(rename = "additionalProperties")]
    additional_properties: Option<serde_json::Value>,
    #[serde(rename = "x-kubernetes-group-version-kind")]
    group_version_kind: Vec<GroupVersionKind>,
    #[serde(rename = "x-kubernetes-embedded-resource")]
    embedded_resource: bool,
    #[serde(rename = "x-kubernetes-preserve-unknown-fields")]
    preserve_unknown_fields: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GroupVersionKind {
    group: String,
    version: String,
    kind: String,
}

impl SchemaObject {
    fn declared_type(&self) -> PropertyType {
        match &self.schema_type {
            Some(t) => PropertyType::parse(t),
            None if self.properties.is_some() => PropertyType::Object,
            None => PropertyType::Unknown,
        }
    }

    fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    fn allows_additional_properties(&self) -> bool {
        match &self.additional_properties {
            None | Some(serde_json::Value::Bool(false)) => false,
            Some(_) => true,
        }
    }
}

/// Load a schema source from swagger JSON content.
pub fn load_swagger_str(content: &str, origin: Option<&Path>) -> Result<SchemaSource, SchemaError> {
    let document: SwaggerDocument =
        serde_json::from_str(content).map_err(|source| SchemaError::Json {
            origin: origin.map(Path::to_path_buf),
            source,
        })?;

    let version = document
        .info
        .and_then(|info| info.version)
        .unwrap_or_default();

    let mut source = SchemaSource::new(version);
    source.origin = origin.map(Path::to_path_buf);

    let mut hoister = Hoister {
        source: &mut source,
    };
    for (name, schema) in &document.definitions {
        hoister.definition(name, schema);
        for key in resource_keys(name, schema) {
            hoister.source.add_resource(key, name.clone());
        }
    }

    log::debug!(
        "loaded schema source {} ({} definitions, {} resources){}",
        source.version,
        source.definitions.len(),
        source.resources.len(),
        origin_suffix(&source.origin)
    );
    Ok(source)
}

/// Load a schema source from a swagger JSON file.
pub fn load_swagger_file(path: &Path) -> Result<SchemaSource, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut source = load_swagger_str(&content, Some(path))?;
    if source.version.is_empty() {
        source.version = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(source)
}

/// Load every `*.json` schema file under a directory (or a single file).
///
/// Files are visited in sorted order so equal-version precedence is stable.
pub fn load_schema_path(path: &Path) -> Result<Vec<SchemaSource>, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![load_swagger_file(path)?]);
    }

    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();
        let is_json = entry_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if entry_path.is_file() && is_json {
            sources.push(load_swagger_file(entry_path)?);
        }
    }
    Ok(sources)
}

/// Build a registry from schema files and directories.
pub fn load_registry<P: AsRef<Path>>(paths: &[P]) -> Result<ModelRegistry, SchemaError> {
    let mut builder = ModelRegistry::builder();
    for path in paths {
        for source in load_schema_path(path.as_ref())? {
            builder.add_source(source);
        }
    }
    Ok(builder.build())
}

fn resource_keys(name: &str, schema: &SchemaObject) -> Vec<ResourceTypeKey> {
    if !schema.group_version_kind.is_empty() {
        return schema
            .group_version_kind
            .iter()
            .filter(|gvk| !gvk.version.is_empty() && !gvk.kind.is_empty())
            .map(|gvk| ResourceTypeKey::new(Some(&gvk.group), &gvk.version, &gvk.kind))
            .collect();
    }

    legacy_key(name).into_iter().collect()
}

/// Key for legacy definition names such as `v1.Pod` or `v1beta1.Deployment`.
fn legacy_key(name: &str) -> Option<ResourceTypeKey> {
    let (version, kind) = name.split_once('.')?;
    let is_version = version.starts_with('v')
        && version[1..].starts_with(|c: char| c.is_ascii_digit())
        && version.chars().all(|c| c.is_ascii_alphanumeric());
    let is_kind = kind.starts_with(|c: char| c.is_ascii_uppercase()) && !kind.contains('.');

    (is_version && is_kind).then(|| ResourceTypeKey::new(None, version, kind))
}

/// Converts swagger schemas into definitions, naming inline objects after
/// the property path that declares them.
struct Hoister<'a> {
    source: &'a mut SchemaSource,
}

impl Hoister<'_> {
    fn definition(&mut self, name: &str, schema: &SchemaObject) {
        let declared = schema.declared_type();
        let is_object = matches!(declared, PropertyType::Object | PropertyType::Unknown)
            && schema.reference.is_none();

        let mut definition = if is_object {
            Definition::object()
        } else {
            Definition::scalar(declared)
        };
        definition.description = schema.description.clone();
        definition.embedded_resource =
            schema.embedded_resource || name.ends_with(RAW_EXTENSION_SUFFIX);
        definition.open = schema.preserve_unknown_fields
            || schema.allows_additional_properties()
            || (is_object && !schema.has_properties());

        // Reserve the slot first so nested hoisted definitions follow their parent.
        self.source.add_definition(name, definition);

        let mut properties = IndexMap::new();
        if let Some(props) = &schema.properties {
            for (prop_name, prop_schema) in props {
                let property = self.property(name, prop_name, prop_schema);
                properties.insert(prop_name.clone(), property);
            }
        }
        if let Some(def) = self.source.definitions.get_mut(name) {
            def.properties = properties;
        }
    }

    fn property(&mut self, owner: &str, name: &str, schema: &SchemaObject) -> PropertySchema {
        let property = if let Some(reference) = &schema.reference {
            PropertySchema::reference(strip_ref(reference))
        } else {
            match schema.declared_type() {
                PropertyType::Array => match schema.items.as_deref() {
                    Some(items) => match self.nested(&format!("{owner}.{name}[]"), items) {
                        Some(definition) => PropertySchema::array_of(definition),
                        None => PropertySchema::array(),
                    },
                    None => PropertySchema::array(),
                },
                PropertyType::Object => match self.nested(&format!("{owner}.{name}"), schema) {
                    Some(definition) => PropertySchema::reference(definition),
                    None => PropertySchema::free_form(),
                },
                other => PropertySchema::scalar(other),
            }
        };

        match &schema.description {
            Some(description) => property.with_description(description.clone()),
            None => property,
        }
    }

    /// Definition name describing `schema` as a nested value, hoisting inline
    /// objects. Returns `None` for scalars and free-form objects.
    fn nested(&mut self, synthetic_name: &str, schema: &SchemaObject) -> Option<String> {
        if let Some(reference) = &schema.reference {
            return Some(strip_ref(reference).to_string());
        }
        if schema.has_properties() || schema.embedded_resource || schema.preserve_unknown_fields {
            self.definition(synthetic_name, schema);
            return Some(synthetic_name.to_string());
        }
        None
    }
}

fn strip_ref(reference: &str) -> &str {
    reference.strip_prefix(REF_PREFIX).unwrap_or(reference)
}
