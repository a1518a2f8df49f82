//! Position-tracking YAML document tree.
//!
//! The tree is an arena of [`Node`]s linked to their parents. Nodes are
//! stored in document pre-order, so iterating [`YamlFile::node_ids`] visits
//! every container before its children.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// Position in the source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
    /// Character offset from the start of the content.
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Identifier of a node within one [`YamlFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this node.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The structural kind of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A top-level document of a (possibly multi-document) file.
    Document { root: Option<NodeId> },
    /// A mapping; entries are [`NodeKind::KeyValue`] nodes in source order.
    Mapping { entries: Vec<NodeId> },
    /// A sequence of item nodes.
    Sequence { items: Vec<NodeId> },
    /// One `key: value` pair of a mapping.
    KeyValue { key: NodeId, value: Option<NodeId> },
    /// A scalar value.
    Scalar { value: String },
    /// An alias (`*name`) reference.
    Alias,
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Where the node starts.
    pub start: Position,
    /// Where the node ends. For key-value pairs this is the start of the
    /// next sibling (or the end of the enclosing mapping), so the range
    /// covers trailing formatting.
    pub end: Position,
}

/// A parsed YAML file holding one or more documents.
#[derive(Debug, Clone)]
pub struct YamlFile {
    id: u64,
    kubernetes: bool,
    pub(crate) nodes: Vec<Node>,
    pub(crate) documents: Vec<NodeId>,
}

impl Default for YamlFile {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlFile {
    /// Create an empty file with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed),
            kubernetes: false,
            nodes: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Process-unique identity of this parsed file.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the file was detected as a Kubernetes YAML file.
    ///
    /// Documents of other files declare no resource type.
    pub fn is_kubernetes(&self) -> bool {
        self.kubernetes
    }

    pub(crate) fn set_kubernetes(&mut self, kubernetes: bool) {
        self.kubernetes = kubernetes;
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Top-level document nodes in source order.
    pub fn documents(&self) -> &[NodeId] {
        &self.documents
    }

    /// All node ids in document pre-order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id.
    ///
    /// Panics if the id belongs to another file.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by id, if it exists in this file.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ancestors of a node, nearest first (excluding the node itself).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    pub fn is_mapping(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Mapping { .. }))
    }

    pub fn is_sequence(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Sequence { .. }))
    }

    pub fn is_key_value(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::KeyValue { .. }))
    }

    /// Key-value entries of a mapping (empty for other nodes).
    pub fn entries(&self, mapping: NodeId) -> &[NodeId] {
        match self.kind(mapping) {
            Some(NodeKind::Mapping { entries }) => entries,
            _ => &[],
        }
    }

    /// Items of a sequence (empty for other nodes).
    pub fn items(&self, sequence: NodeId) -> &[NodeId] {
        match self.kind(sequence) {
            Some(NodeKind::Sequence { items }) => items,
            _ => &[],
        }
    }

    /// Text of a scalar node.
    pub fn scalar(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Scalar { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// The key node of a key-value pair.
    pub fn key_node(&self, key_value: NodeId) -> Option<NodeId> {
        match self.kind(key_value) {
            Some(NodeKind::KeyValue { key, .. }) => Some(*key),
            _ => None,
        }
    }

    /// The value node of a key-value pair.
    pub fn value(&self, key_value: NodeId) -> Option<NodeId> {
        match self.kind(key_value) {
            Some(NodeKind::KeyValue { value, .. }) => *value,
            _ => None,
        }
    }

    /// Text of a key-value pair's key, if the key is a scalar.
    pub fn key_text(&self, key_value: NodeId) -> Option<&str> {
        self.key_node(key_value).and_then(|k| self.scalar(k))
    }

    /// Find the entry of a mapping whose (trimmed) key equals `name`.
    pub fn entry(&self, mapping: NodeId, name: &str) -> Option<NodeId> {
        self.entries(mapping)
            .iter()
            .copied()
            .find(|&kv| self.key_text(kv).map(str::trim) == Some(name))
    }

    /// Scalar value stored under `name` in a mapping.
    pub fn scalar_entry(&self, mapping: NodeId, name: &str) -> Option<&str> {
        self.entry(mapping, name)
            .and_then(|kv| self.value(kv))
            .and_then(|v| self.scalar(v))
    }

    /// The document node enclosing `id` (or `id` itself if it is a document).
    pub fn document_of(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| matches!(self.kind(n), Some(NodeKind::Document { .. })))
    }

    /// Root value node of a document.
    pub fn document_root(&self, document: NodeId) -> Option<NodeId> {
        match self.kind(document) {
            Some(NodeKind::Document { root }) => *root,
            _ => None,
        }
    }
}
