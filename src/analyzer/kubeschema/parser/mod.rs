//! YAML parser for Kubernetes manifests.
//!
//! Provides a document tree with position tracking and parent links, so
//! analysis can start at any node and walk up to its enclosing document.

pub mod tree;
pub mod yaml;

pub use tree::{Node, NodeId, NodeKind, Position, YamlFile};
pub use yaml::{ParseError, parse_source, parse_yaml};
