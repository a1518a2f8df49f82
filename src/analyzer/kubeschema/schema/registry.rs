//! The model registry: every known resource schema, keyed by resource type.
//!
//! Registries are assembled with [`ModelRegistryBuilder`] and immutable
//! afterwards. The process-wide instance is published once through a
//! [`OnceLock`], after which any number of threads may read it without
//! locking.
//!
//! When several schema sources register the same [`ResourceTypeKey`], the
//! source with the highest version wins. Versions are compared as semver
//! (a leading `v` is ignored) and unparseable versions rank lowest. Among
//! sources with equal versions, the one added last wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::key::ResourceTypeKey;
use super::model::{Model, ModelId, PropertyDescriptor};
use super::source::{PropertySchema, SchemaSource};

static GLOBAL_REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// Summary of a schema source that went into a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub version: String,
    pub origin: Option<PathBuf>,
    pub definitions: usize,
    pub resources: usize,
}

/// Immutable index of resource schemas.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<Model>,
    index: HashMap<ResourceTypeKey, ModelId>,
    sources: Vec<SourceInfo>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::new()
    }

    /// The root model registered for exactly this key.
    pub fn lookup(&self, key: &ResourceTypeKey) -> Option<&Model> {
        self.model_id(key).and_then(|id| self.model(id))
    }

    pub fn model_id(&self, key: &ResourceTypeKey) -> Option<ModelId> {
        self.index.get(key).copied()
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.index())
    }

    /// Find a model by definition name, preferring the highest-precedence source.
    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().rev().find(|m| m.name == name)
    }

    pub fn contains(&self, key: &ResourceTypeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Registered resource keys, sorted.
    pub fn keys(&self) -> Vec<&ResourceTypeKey> {
        let mut keys: Vec<_> = self.index.keys().collect();
        keys.sort();
        keys
    }

    /// Sources in precedence order (lowest first).
    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    /// Number of registered resource keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of models across all sources.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

/// Collects schema sources and links them into a [`ModelRegistry`].
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    sources: Vec<SchemaSource>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: SchemaSource) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: SchemaSource) {
        self.sources.push(source);
    }

    pub fn build(self) -> ModelRegistry {
        let mut sources = self.sources;
        // Stable sort keeps insertion order among equal versions.
        sources.sort_by_key(|s| s.precedence());

        let mut registry = ModelRegistry::default();
        for source in &sources {
            link_source(&mut registry, source);
        }

        log::debug!(
            "model registry built: {} resource type(s), {} model(s), {} source(s)",
            registry.index.len(),
            registry.models.len(),
            registry.sources.len()
        );
        registry
    }
}

fn link_source(registry: &mut ModelRegistry, source: &SchemaSource) {
    let base = registry.models.len();
    let ids: HashMap<&str, ModelId> = source
        .definitions
        .iter()
        .filter(|(_, def)| def.is_object())
        .enumerate()
        .map(|(n, (name, _))| (name.as_str(), ModelId((base + n) as u32)))
        .collect();

    for (name, definition) in source.definitions.iter().filter(|(_, d)| d.is_object()) {
        let properties = definition
            .properties
            .iter()
            .map(|(prop_name, schema)| (prop_name.clone(), link_property(source, &ids, schema)))
            .collect();

        registry.models.push(Model {
            name: name.clone(),
            description: definition.description.clone(),
            properties,
            open: definition.open,
            embedded_resource: definition.embedded_resource,
        });
    }

    let mut resources = 0;
    for (key, definition) in &source.resources {
        let Some(&id) = ids.get(definition.as_str()) else {
            log::debug!(
                "resource {} refers to unknown definition '{}' in source {}",
                key,
                definition,
                source.version
            );
            continue;
        };
        resources += 1;
        if registry.index.insert(key.clone(), id).is_some() {
            log::debug!("resource {} overridden by source {}", key, source.version);
        }
    }

    registry.sources.push(SourceInfo {
        version: source.version.clone(),
        origin: source.origin.clone(),
        definitions: ids.len(),
        resources,
    });
}

fn link_property(
    source: &SchemaSource,
    ids: &HashMap<&str, ModelId>,
    schema: &PropertySchema,
) -> PropertyDescriptor {
    let mut property_type = schema.property_type;
    let mut model = None;

    if let Some(reference) = &schema.reference {
        match source.definitions.get(reference) {
            Some(def) if def.is_object() => model = ids.get(reference.as_str()).copied(),
            Some(def) => property_type = def.definition_type,
            None => log::trace!("unresolved reference '{}'", reference),
        }
    }

    let items = schema
        .items
        .as_deref()
        .and_then(|reference| ids.get(reference).copied());

    PropertyDescriptor {
        property_type,
        model,
        items,
        description: schema.description.clone(),
    }
}

/// Publish the process-wide registry.
///
/// Returns the registry back if one was already installed.
pub fn install_global(registry: ModelRegistry) -> Result<&'static ModelRegistry, ModelRegistry> {
    GLOBAL_REGISTRY.set(registry)?;
    Ok(GLOBAL_REGISTRY.get_or_init(ModelRegistry::default))
}

/// The process-wide registry, if it has been installed.
pub fn global() -> Option<&'static ModelRegistry> {
    GLOBAL_REGISTRY.get()
}

/// The process-wide registry, building it with `init` on first use.
pub fn global_or_init(init: impl FnOnce() -> ModelRegistry) -> &'static ModelRegistry {
    GLOBAL_REGISTRY.get_or_init(init)
}
