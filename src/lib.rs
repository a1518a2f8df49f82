//! # kube-schema-lint
//!
//! Structural validation of Kubernetes manifests against versioned OpenAPI
//! schemas: every property that the schema for its place in the document
//! does not declare is reported, with a "delete this property" fix.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kube_schema_lint::analyzer::kubeschema::{KubeSchemaConfig, lint_content, load_registry};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = load_registry(&[Path::new("schemas/")])?;
//! let result = lint_content(
//!     "apiVersion: v1\nkind: Pod\nspec:\n  bogus: true\n",
//!     &registry,
//!     &KubeSchemaConfig::default(),
//! );
//! for failure in &result.failures {
//!     println!("{}: {}", failure.location(), failure.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod handlers;

pub use error::{KubeSchemaError, Result};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
