//! Schema-driven structural validation of Kubernetes manifests.
//!
//! Detects Kubernetes YAML files, resolves each document's resource type
//! (`apiVersion` + `kind`) against versioned OpenAPI schemas, and reports
//! every property the schema at that place in the document does not declare.
//!
//! # Features
//!
//! - Content-based detection of Kubernetes YAML files
//! - Model registry built from Kubernetes `swagger.json` files, with
//!   newest-version-wins precedence across schema versions
//! - Schema resolution through nested objects, arrays and embedded resources
//!   (e.g. the items of a `List`)
//! - "Delete this property" fixes carried as data
//! - Plain, JSON and GitHub Actions output
//!
//! # Example
//!
//! ```rust,ignore
//! use kube_schema_lint::analyzer::kubeschema::{lint, load_registry, KubeSchemaConfig};
//! use std::path::Path;
//!
//! let registry = load_registry(&[Path::new("schemas/")])?;
//! let config = KubeSchemaConfig::default();
//! let result = lint(&[Path::new("./k8s")], &registry, &config);
//!
//! for failure in result.failures {
//!     println!("{}: {}", failure.location(), failure.message);
//! }
//! ```

pub mod config;
pub mod detect;
pub mod formatter;
pub mod guard;
pub mod lint;
pub mod navigator;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod validator;

pub use config::{ConfigError, KubeSchemaConfig};
pub use detect::{DiskFile, MemoryFile, SourceFile, StubFile, is_kubernetes_file, is_kubernetes_yaml};
pub use formatter::{OutputFormat, format_result, format_result_to_string};
pub use guard::RecursionGuard;
pub use lint::{
    LintResult, LintSummary, annotate, collect_files, lint, lint_content, lint_file, lint_source,
};
pub use navigator::{find_resource_key, property_path};
pub use parser::{ParseError, YamlFile, parse_source, parse_yaml};
pub use resolver::{resolve_mapping, resolve_model, resolve_path};
pub use schema::{
    Model, ModelRegistry, PropertyDescriptor, PropertyType, ResourceTypeKey, SchemaError,
    SchemaSource, load_registry,
};
pub use types::{CheckFailure, Diagnostic, DiagnosticSink, Fix, RuleCode, Severity};
pub use validator::{validate_mapping, validate_property};
