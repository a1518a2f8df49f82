//! Document navigation: from any node up to its enclosing resource.
//!
//! Every document in a (possibly multi-document) file declares its resource
//! type through the `apiVersion` and `kind` scalars of its root mapping. The
//! navigator finds that pair for any node, and computes the property path
//! from the document root down to a node.

use super::guard::RecursionGuard;
use super::parser::{NodeId, NodeKind, YamlFile};
use super::schema::ResourceTypeKey;

pub const API_VERSION_FIELD: &str = "apiVersion";
pub const KIND_FIELD: &str = "kind";

static RESOURCE_KEY_GUARD: RecursionGuard = RecursionGuard::new("KubernetesResourceKey");

/// One step of a property path: a key-value node and its key text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub key_value: NodeId,
    pub name: String,
}

/// Resource type declared by the document enclosing `node`.
///
/// Returns `None` for files not detected as Kubernetes YAML, when the
/// document has no root mapping, or when its `apiVersion` or `kind` is
/// missing, blank or not a scalar.
pub fn find_resource_key(file: &YamlFile, node: NodeId) -> Option<ResourceTypeKey> {
    if !file.is_kubernetes() {
        return None;
    }
    let guard_key = format!("{}:{}", file.id(), node.index());
    RESOURCE_KEY_GUARD.do_preventing_recursion(&guard_key, None, || {
        let document = file.document_of(node)?;
        let root = file.document_root(document)?;
        resource_key_of_mapping(file, root)
    })
}

/// Resource type declared directly by a mapping's `apiVersion` and `kind`.
pub fn resource_key_of_mapping(file: &YamlFile, mapping: NodeId) -> Option<ResourceTypeKey> {
    if !file.is_mapping(mapping) {
        return None;
    }
    let api_version = file.scalar_entry(mapping, API_VERSION_FIELD)?;
    let kind = file.scalar_entry(mapping, KIND_FIELD)?;
    ResourceTypeKey::from_fields(api_version, kind)
}

/// The root mapping of the document enclosing `node`, if the document root is a mapping.
pub fn document_root_mapping(file: &YamlFile, node: NodeId) -> Option<NodeId> {
    let document = file.document_of(node)?;
    file.document_root(document).filter(|&root| file.is_mapping(root))
}

/// Property path from the document root down to `node`, excluding `node`
/// itself.
///
/// Each key-value ancestor contributes one segment. Sequences contribute
/// nothing, so items of an array share the path of the array property.
/// Returns `None` if an ancestor's key is not a scalar, since such a path
/// cannot be named.
pub fn property_path(file: &YamlFile, node: NodeId) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    for ancestor in file.ancestors(node) {
        match file.kind(ancestor) {
            Some(NodeKind::KeyValue { .. }) => {
                let name = file.key_text(ancestor)?.trim().to_string();
                segments.push(PathSegment {
                    key_value: ancestor,
                    name,
                });
            }
            Some(NodeKind::Document { .. }) => break,
            _ => {}
        }
    }
    segments.reverse();
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::kubeschema::parser::parse_yaml;

    fn find_key(file: &YamlFile, mapping: NodeId, name: &str) -> NodeId {
        file.entry(mapping, name).unwrap()
    }

    #[test]
    fn test_find_resource_key_from_deep_node() {
        let file = parse_yaml(
            "apiVersion: apps/v1\nkind: Deployment\nspec:\n  template:\n    spec:\n      containers:\n        - name: web\n",
        )
        .unwrap();
        let container_name = file
            .node_ids()
            .filter(|&id| file.key_text(id) == Some("name"))
            .last()
            .unwrap();

        let key = find_resource_key(&file, container_name).unwrap();
        assert_eq!(key, ResourceTypeKey::new(Some("apps"), "v1", "Deployment"));
    }

    #[test]
    fn test_multi_document_keys_are_independent() {
        let file = parse_yaml(
            "apiVersion: v1\nkind: Service\nspec: {}\n---\napiVersion: v1\nkind: Pod\nspec: {}\n",
        )
        .unwrap();
        let docs = file.documents();
        assert_eq!(docs.len(), 2);

        let first = file.document_root(docs[0]).unwrap();
        let second = file.document_root(docs[1]).unwrap();
        let first_spec = find_key(&file, first, "spec");
        let second_spec = find_key(&file, second, "spec");

        assert_eq!(find_resource_key(&file, first_spec).unwrap().kind, "Service");
        assert_eq!(find_resource_key(&file, second_spec).unwrap().kind, "Pod");
    }

    #[test]
    fn test_missing_fields() {
        let file = parse_yaml("kind: Pod\nspec: {}\n").unwrap();
        let root = file.document_root(file.documents()[0]).unwrap();
        assert!(find_resource_key(&file, find_key(&file, root, "spec")).is_none());

        let file = parse_yaml("apiVersion: v1\nkind:\n  nested: true\n").unwrap();
        let root = file.document_root(file.documents()[0]).unwrap();
        assert!(find_resource_key(&file, root).is_none());
    }

    #[test]
    fn test_non_kubernetes_file_has_no_resource_key() {
        let mut content = "#".repeat(5000);
        content.push_str("\nspec: {bogus: 1}\napiVersion: v1\nkind: Pod\n");
        let file = parse_yaml(&content).unwrap();
        let root = file.document_root(file.documents()[0]).unwrap();

        assert!(!file.is_kubernetes());
        assert!(find_resource_key(&file, find_key(&file, root, "spec")).is_none());
        assert!(resource_key_of_mapping(&file, root).is_some());
    }

    #[test]
    fn test_non_mapping_document() {
        let file = parse_yaml("- apiVersion: v1\n  kind: Pod\n").unwrap();
        let root = file.document_root(file.documents()[0]).unwrap();
        assert!(find_resource_key(&file, root).is_none());
        assert!(document_root_mapping(&file, root).is_none());
    }

    #[test]
    fn test_reentrant_lookup_yields_none() {
        let file = parse_yaml("apiVersion: v1\nkind: Pod\n").unwrap();
        let root = file.document_root(file.documents()[0]).unwrap();
        let guard_key = format!("{}:{}", file.id(), root.index());

        let nested = RESOURCE_KEY_GUARD.do_preventing_recursion(&guard_key, None, || {
            Some(find_resource_key(&file, root))
        });
        assert_eq!(nested, Some(None));
        assert!(find_resource_key(&file, root).is_some());
    }

    #[test]
    fn test_property_path() {
        let file = parse_yaml(
            "apiVersion: v1\nkind: Pod\nspec:\n  containers:\n    - name: web\n      ports:\n        - containerPort: 80\n",
        )
        .unwrap();
        let port = file
            .node_ids()
            .find(|&id| file.key_text(id) == Some("containerPort"))
            .unwrap();

        let names: Vec<String> = property_path(&file, port)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["spec", "containers", "ports"]);

        let root = file.document_root(file.documents()[0]).unwrap();
        let spec = find_key(&file, root, "spec");
        assert!(property_path(&file, spec).unwrap().is_empty());
        assert!(property_path(&file, root).unwrap().is_empty());
    }

    #[test]
    fn test_property_path_with_complex_key() {
        let file = parse_yaml("? [a, b]\n:\n  inner: 1\n").unwrap();
        let inner = file
            .node_ids()
            .find(|&id| file.key_text(id) == Some("inner"))
            .unwrap();
        assert!(property_path(&file, inner).is_none());
    }
}
