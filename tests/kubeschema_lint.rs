use kube_schema_lint::analyzer::kubeschema::{
    Diagnostic, Fix, KubeSchemaConfig, ModelRegistry, ResourceTypeKey, Severity, annotate,
    is_kubernetes_yaml, lint, lint_file, load_registry, parse_yaml, resolve_path,
};
use std::path::{Path, PathBuf};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn manifest(name: &str) -> PathBuf {
    fixtures().join("manifests").join(name)
}

fn registry() -> ModelRegistry {
    load_registry(&[fixtures().join("schemas")]).expect("fixture schemas should load")
}

fn messages(failures: &[kube_schema_lint::analyzer::kubeschema::CheckFailure]) -> Vec<&str> {
    failures.iter().map(|f| f.message.as_str()).collect()
}

#[test]
fn test_registry_from_schema_directory() {
    let registry = registry();

    assert_eq!(registry.sources().len(), 2);
    assert!(registry.contains(&ResourceTypeKey::new(None, "v1", "Pod")));
    assert!(registry.contains(&ResourceTypeKey::new(Some("apps"), "v1", "Deployment")));
    assert!(registry.contains(&ResourceTypeKey::new(Some("batch"), "v1", "Job")));
    assert!(!registry.contains(&ResourceTypeKey::new(Some("example.com"), "v1", "Widget")));
}

#[test]
fn test_newest_schema_version_wins() {
    let registry = registry();
    let pod = ResourceTypeKey::new(None, "v1", "Pod");

    let spec = resolve_path(&registry, &pod, &["spec"]).expect("pod spec model");
    assert!(spec.has_property("hostname"));
    assert!(!spec.has_property("removedInNewerVersions"));

    let container = resolve_path(&registry, &pod, &["spec", "containers"]).expect("container model");
    assert!(container.has_property("image"));
}

#[test]
fn test_bogus_pod_property() {
    let registry = registry();
    let result = lint_file(&manifest("pod-bogus.yaml"), &registry, &KubeSchemaConfig::default());

    assert_eq!(result.failures.len(), 1);
    let failure = &result.failures[0];
    assert_eq!(failure.message, "Property 'bogus' is not expected here.");
    assert_eq!(failure.severity, Severity::Warning);
    assert_eq!(failure.resource.as_deref(), Some("v1/Pod"));
    assert_eq!((failure.line, failure.column), (Some(5), Some(3)));
    assert!(matches!(
        &failure.fix,
        Some(Fix::DeleteProperty { name, .. }) if name == "bogus"
    ));
    assert!(!result.summary.passed);
}

#[test]
fn test_deep_nesting_through_arrays() {
    let registry = registry();
    let result = lint_file(&manifest("deployment.yaml"), &registry, &KubeSchemaConfig::default());

    assert_eq!(messages(&result.failures), vec!["Property 'protocl' is not expected here."]);
    let failure = &result.failures[0];
    assert_eq!(failure.resource.as_deref(), Some("apps/v1/Deployment"));
    assert_eq!((failure.line, failure.column), (Some(22), Some(15)));
}

#[test]
fn test_multi_document_file() {
    let registry = registry();
    let result = lint_file(&manifest("multi.yaml"), &registry, &KubeSchemaConfig::default());

    assert_eq!(result.summary.documents_checked, 3);
    assert_eq!(messages(&result.failures), vec!["Property 'backoffLimit' is not expected here."]);
    assert_eq!(result.failures[0].resource.as_deref(), Some("batch/v1/Job"));
    assert_eq!(result.failures[0].line, Some(12));
}

#[test]
fn test_list_items_use_their_own_resource_type() {
    let registry = registry();
    let result = lint_file(&manifest("list.yaml"), &registry, &KubeSchemaConfig::default());

    assert_eq!(messages(&result.failures), vec!["Property 'restartPolcy' is not expected here."]);
    assert_eq!(
        (result.failures[0].line, result.failures[0].column),
        (Some(12), Some(7))
    );
}

#[test]
fn test_helm_values_are_not_kubernetes_files() {
    assert!(!is_kubernetes_yaml(&manifest("values.yaml")));
    assert!(is_kubernetes_yaml(&manifest("pod-bogus.yaml")));

    let result = lint_file(&manifest("values.yaml"), &registry(), &KubeSchemaConfig::default());
    assert!(result.failures.is_empty());
    assert_eq!(result.summary.files_skipped, 1);
}

#[test]
fn test_lint_fixture_directory() {
    let registry = registry();
    let result = lint(&[fixtures().join("manifests")], &registry, &KubeSchemaConfig::default());

    assert_eq!(result.summary.files_checked, 4);
    assert_eq!(result.summary.files_skipped, 1);
    assert_eq!(result.failures.len(), 4);
    assert!(result.parse_errors.is_empty());

    // Sorted by file, then position.
    let files: Vec<String> = result
        .failures
        .iter()
        .filter_map(|f| f.file_path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(files, vec!["deployment.yaml", "list.yaml", "multi.yaml", "pod-bogus.yaml"]);
}

#[test]
fn test_ignore_and_threshold() {
    let registry = registry();
    let config = KubeSchemaConfig::new()
        .ignore_path("deployment.yaml")
        .with_threshold(Severity::Error);
    let result = lint(&[fixtures().join("manifests")], &registry, &config);

    assert_eq!(result.failures.len(), 3);
    assert!(result.summary.passed);
    assert!(!result.should_fail(&config));
}

#[test]
fn test_annotate_parsed_file() {
    let registry = registry();
    let file = parse_yaml(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\n  lables:\n    app: web\n",
    )
    .unwrap();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let count = annotate(&registry, &file, &KubeSchemaConfig::default(), &mut diagnostics);

    assert_eq!(count, 1);
    assert_eq!(diagnostics[0].message, "Property 'lables' is not expected here.");
    assert_eq!(diagnostics[0].position.line, 5);
}
