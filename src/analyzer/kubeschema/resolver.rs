//! Schema resolution: which model applies at a given place in a document.
//!
//! Resolution walks the registry's root model for a resource type in lockstep
//! with the document's property path. Object properties descend into their
//! nested model, array properties into their element model (sequence items
//! consume no path segment). A segment the current model does not declare,
//! or a scalar property with segments left over, ends the walk with `None`.
//!
//! Models marked as embedded resources (e.g. `runtime.RawExtension` items of
//! a `List`) hold complete objects. When the walk enters one and the mapping
//! there declares its own `apiVersion` and `kind`, the walk continues from
//! that resource's root model.

use super::navigator::{self, PathSegment};
use super::parser::{NodeId, YamlFile};
use super::schema::{Model, ModelRegistry, ResourceTypeKey};

/// Model applying to the keys of the mapping that contains `key_value`.
///
/// The path runs from the document root down to, but not including, the
/// key-value pair's own key. A direct child of the root mapping therefore
/// resolves to the root model.
pub fn resolve_model<'r>(
    registry: &'r ModelRegistry,
    key: &ResourceTypeKey,
    file: &YamlFile,
    key_value: NodeId,
) -> Option<&'r Model> {
    if !file.is_key_value(key_value) {
        return None;
    }
    let mapping = file.parent(key_value)?;
    resolve_mapping(registry, key, file, mapping)
}

/// Model applying to the keys of `mapping`.
pub fn resolve_mapping<'r>(
    registry: &'r ModelRegistry,
    key: &ResourceTypeKey,
    file: &YamlFile,
    mapping: NodeId,
) -> Option<&'r Model> {
    if !file.is_mapping(mapping) {
        return None;
    }
    let path = navigator::property_path(file, mapping)?;
    let root = registry.lookup(key)?;
    walk(registry, root, file, &path, mapping)
}

/// Model reached by following property names from a resource's root model.
///
/// Embedded resources are not dispatched on, since there is no document to
/// read their `apiVersion` and `kind` from.
pub fn resolve_path<'r>(
    registry: &'r ModelRegistry,
    key: &ResourceTypeKey,
    path: &[&str],
) -> Option<&'r Model> {
    let mut model = registry.lookup(key)?;
    for name in path {
        model = descend(registry, model, name)?;
    }
    Some(model)
}

fn walk<'r>(
    registry: &'r ModelRegistry,
    root: &'r Model,
    file: &YamlFile,
    path: &[PathSegment],
    target: NodeId,
) -> Option<&'r Model> {
    let mut model = root;
    for (i, segment) in path.iter().enumerate() {
        model = descend(registry, model, &segment.name)?;

        if model.embedded_resource {
            // The mapping just entered: holds the next segment, or is the target.
            let entered = match path.get(i + 1) {
                Some(next) => file.parent(next.key_value)?,
                None => target,
            };
            if let Some(embedded) = embedded_model(registry, file, entered) {
                model = embedded;
            }
        }
    }
    Some(model)
}

fn descend<'r>(registry: &'r ModelRegistry, model: &'r Model, name: &str) -> Option<&'r Model> {
    let Some(property) = model.property(name) else {
        log::trace!("'{}' is not declared by {}", name, model.name);
        return None;
    };
    registry.model(property.child_model()?)
}

fn embedded_model<'r>(
    registry: &'r ModelRegistry,
    file: &YamlFile,
    mapping: NodeId,
) -> Option<&'r Model> {
    let key = navigator::resource_key_of_mapping(file, mapping)?;
    let model = registry.lookup(&key);
    if model.is_none() {
        log::debug!("embedded resource {} has no registered schema", key);
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::kubeschema::parser::parse_yaml;
    use crate::analyzer::kubeschema::schema::{Definition, PropertySchema, PropertyType, SchemaSource};

    fn string() -> PropertySchema {
        PropertySchema::scalar(PropertyType::String)
    }

    fn registry() -> ModelRegistry {
        let source = SchemaSource::new("v1.29.0")
            .definition(
                "v1.Pod",
                Definition::object()
                    .property("apiVersion", string())
                    .property("kind", string())
                    .property("metadata", PropertySchema::reference("v1.ObjectMeta"))
                    .property("spec", PropertySchema::reference("v1.PodSpec")),
            )
            .definition(
                "v1.ObjectMeta",
                Definition::object()
                    .property("name", string())
                    .property("labels", PropertySchema::free_form()),
            )
            .definition(
                "v1.PodSpec",
                Definition::object()
                    .property("containers", PropertySchema::array_of("v1.Container"))
                    .property("hostname", string()),
            )
            .definition(
                "v1.Container",
                Definition::object()
                    .property("name", string())
                    .property("image", string()),
            )
            .definition(
                "v1.List",
                Definition::object()
                    .property("apiVersion", string())
                    .property("kind", string())
                    .property("items", PropertySchema::array_of("runtime.RawExtension")),
            )
            .definition("runtime.RawExtension", Definition::object().open().embedded_resource())
            .resource(ResourceTypeKey::new(None, "v1", "Pod"), "v1.Pod")
            .resource(ResourceTypeKey::new(None, "v1", "List"), "v1.List");
        ModelRegistry::builder().source(source).build()
    }

    fn pod_key() -> ResourceTypeKey {
        ResourceTypeKey::new(None, "v1", "Pod")
    }

    fn key_value(file: &YamlFile, name: &str) -> NodeId {
        file.node_ids()
            .find(|&id| file.key_text(id) == Some(name))
            .unwrap()
    }

    #[test]
    fn test_empty_path_is_root_model() {
        let registry = registry();
        let file = parse_yaml("apiVersion: v1\nkind: Pod\nspec: {}\n").unwrap();
        let spec = key_value(&file, "spec");

        let model = resolve_model(&registry, &pod_key(), &file, spec).unwrap();
        assert_eq!(model.name, "v1.Pod");
        assert_eq!(resolve_path(&registry, &pod_key(), &[]).unwrap().name, "v1.Pod");
    }

    #[test]
    fn test_nested_object() {
        let registry = registry();
        let file = parse_yaml("apiVersion: v1\nkind: Pod\nspec:\n  hostname: a\n").unwrap();
        let hostname = key_value(&file, "hostname");

        let model = resolve_model(&registry, &pod_key(), &file, hostname).unwrap();
        assert_eq!(model.name, "v1.PodSpec");
    }

    #[test]
    fn test_array_descends_into_element_model() {
        let registry = registry();
        let file = parse_yaml(
            "apiVersion: v1\nkind: Pod\nspec:\n  containers:\n    - name: web\n      image: nginx\n",
        )
        .unwrap();
        let image = key_value(&file, "image");

        let model = resolve_model(&registry, &pod_key(), &file, image).unwrap();
        assert_eq!(model.name, "v1.Container");
        assert_eq!(
            resolve_path(&registry, &pod_key(), &["spec", "containers"])
                .unwrap()
                .name,
            "v1.Container"
        );
    }

    #[test]
    fn test_unknown_segment_fails() {
        let registry = registry();
        let file = parse_yaml("apiVersion: v1\nkind: Pod\nspec:\n  bogus:\n    inner: 1\n").unwrap();
        let inner = key_value(&file, "inner");

        assert!(resolve_model(&registry, &pod_key(), &file, inner).is_none());
        assert!(resolve_path(&registry, &pod_key(), &["spec", "bogus"]).is_none());
    }

    #[test]
    fn test_scalar_with_remaining_segments_fails() {
        let registry = registry();
        assert!(resolve_path(&registry, &pod_key(), &["spec", "hostname", "x"]).is_none());
        // Free-form objects have no nested model either.
        assert!(resolve_path(&registry, &pod_key(), &["metadata", "labels"]).is_none());
    }

    #[test]
    fn test_unknown_resource_type() {
        let registry = registry();
        let key = ResourceTypeKey::new(Some("apps"), "v1", "Deployment");
        assert!(resolve_path(&registry, &key, &[]).is_none());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry();
        let first = resolve_path(&registry, &pod_key(), &["spec"]).unwrap();
        let second = resolve_path(&registry, &pod_key(), &["spec"]).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_embedded_resource_dispatches_on_kind() {
        let registry = registry();
        let file = parse_yaml(
            "apiVersion: v1\nkind: List\nitems:\n  - apiVersion: v1\n    kind: Pod\n    spec:\n      hostname: a\n",
        )
        .unwrap();
        let list_key = ResourceTypeKey::new(None, "v1", "List");

        let hostname = key_value(&file, "hostname");
        let model = resolve_model(&registry, &list_key, &file, hostname).unwrap();
        assert_eq!(model.name, "v1.PodSpec");

        let items = file.value(key_value(&file, "items")).unwrap();
        let item = file.items(items)[0];
        let model = resolve_mapping(&registry, &list_key, &file, item).unwrap();
        assert_eq!(model.name, "v1.Pod");
    }

    #[test]
    fn test_embedded_resource_without_type_stays_open() {
        let registry = registry();
        let file = parse_yaml("apiVersion: v1\nkind: List\nitems:\n  - anything: 1\n").unwrap();
        let list_key = ResourceTypeKey::new(None, "v1", "List");

        let anything = key_value(&file, "anything");
        let model = resolve_model(&registry, &list_key, &file, anything).unwrap();
        assert_eq!(model.name, "runtime.RawExtension");
        assert!(model.open);
    }
}
