//! Structural validation: keys present in a mapping that its schema does not
//! declare.
//!
//! Each check looks at one mapping only. Nested mappings are checked when
//! the caller visits them, so a document is validated by visiting every
//! key-value pair (see [`super::lint`]). Whenever the resource type or the
//! path cannot be resolved, nothing is reported.

use super::navigator;
use super::parser::{NodeId, YamlFile};
use super::resolver;
use super::schema::{Model, ModelRegistry};
use super::types::{Diagnostic, DiagnosticSink, Fix, Severity};

/// Check the mapping value of a key-value pair against its schema.
///
/// A no-op unless the value is a mapping inside a document whose resource
/// type and path both resolve. Returns the number of diagnostics reported.
pub fn validate_property(
    registry: &ModelRegistry,
    file: &YamlFile,
    key_value: NodeId,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    match file.value(key_value) {
        Some(value) if file.is_mapping(value) => validate_node(registry, file, value, sink),
        _ => 0,
    }
}

/// Check the mapping items of a key-value pair whose value is a sequence.
pub fn validate_sequence_items(
    registry: &ModelRegistry,
    file: &YamlFile,
    key_value: NodeId,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let Some(value) = file.value(key_value) else {
        return 0;
    };
    file.items(value)
        .iter()
        .filter(|&&item| file.is_mapping(item))
        .map(|&item| validate_node(registry, file, item, sink))
        .sum()
}

/// Check the root mapping of a document against its resource's root model.
pub fn validate_document_root(
    registry: &ModelRegistry,
    file: &YamlFile,
    document: NodeId,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    match file.document_root(document) {
        Some(root) if file.is_mapping(root) => validate_node(registry, file, root, sink),
        _ => 0,
    }
}

fn validate_node(
    registry: &ModelRegistry,
    file: &YamlFile,
    mapping: NodeId,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let Some(key) = navigator::find_resource_key(file, mapping) else {
        return 0;
    };
    match resolver::resolve_mapping(registry, &key, file, mapping) {
        Some(model) => validate_mapping(model, file, mapping, sink),
        None => 0,
    }
}

/// Report every key of `mapping` that `model` does not declare, in key order.
///
/// Open models accept any key. Keys that are not scalars are skipped.
pub fn validate_mapping(
    model: &Model,
    file: &YamlFile,
    mapping: NodeId,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    if model.open {
        return 0;
    }

    let mut reported = 0;
    for &key_value in file.entries(mapping) {
        let Some(key_node) = file.key_node(key_value) else {
            continue;
        };
        let Some(name) = file.scalar(key_node) else {
            continue;
        };
        if model.has_property(name.trim()) {
            continue;
        }

        sink.report(unknown_property(file, key_value, key_node, name));
        reported += 1;
    }
    reported
}

fn unknown_property(file: &YamlFile, key_value: NodeId, key_node: NodeId, name: &str) -> Diagnostic {
    let pair = file.node(key_value);
    let fix = Fix::DeleteProperty {
        target: Some(key_value),
        name: name.to_string(),
        start: pair.start,
        end: pair.end,
    };

    Diagnostic::new(
        key_node,
        file.node(key_node).start,
        Severity::Warning,
        format!("Property '{}' is not expected here.", name),
    )
    .with_fix(fix)
}
