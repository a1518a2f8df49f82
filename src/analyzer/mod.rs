//! # Analyzer Module
//!
//! Kubernetes manifest analysis:
//! - Kubernetes YAML file detection
//! - Resource type resolution against versioned schemas
//! - Structural validation of document properties

pub mod kubeschema;

pub use kubeschema::{
    CheckFailure, KubeSchemaConfig, LintResult, ModelRegistry, ResourceTypeKey, Severity, lint,
    lint_content, lint_file,
};
