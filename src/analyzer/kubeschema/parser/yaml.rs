//! Builds a [`YamlFile`] tree from `yaml-rust2` parser events.
//!
//! The event stream carries a [`Marker`] per event, which gives every node a
//! line/column position without re-scanning the source.

use std::io::Read;

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use super::tree::{Node, NodeId, NodeKind, Position, YamlFile};
use crate::analyzer::kubeschema::detect::{self, BYTES_TO_READ, SourceFile};

/// Error type for parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("YAML parse error: {0}")]
    Syntax(String),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Parse YAML content (one or more documents) into a tree.
///
/// The tree counts as Kubernetes content when a line within the first
/// [`BYTES_TO_READ`] bytes starts with `kind: ` or `apiVersion: `.
pub fn parse_yaml(content: &str) -> Result<YamlFile, ParseError> {
    let mut file = build_tree(content)?;
    let head = &content.as_bytes()[..content.len().min(BYTES_TO_READ as usize)];
    file.set_kubernetes(detect::contains_kubernetes_marker(head));
    Ok(file)
}

/// Read and parse a source file, recording whether it is a Kubernetes file.
pub fn parse_source(source: &dyn SourceFile) -> Result<YamlFile, ParseError> {
    let mut content = String::new();
    source
        .open()
        .and_then(|mut reader| reader.read_to_string(&mut content))
        .map_err(|e| ParseError::Io(e.to_string()))?;

    let mut file = build_tree(&content)?;
    file.set_kubernetes(detect::is_kubernetes_file(source));
    Ok(file)
}

fn build_tree(content: &str) -> Result<YamlFile, ParseError> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new_from_str(content);
    parser
        .load(&mut builder, true)
        .map_err(|e| ParseError::Syntax(e.to_string()))?;

    let file = builder.finish();
    log::trace!(
        "parsed {} document(s), {} node(s)",
        file.documents().len(),
        file.len()
    );
    Ok(file)
}

enum Frame {
    Mapping { id: NodeId, pending: Option<NodeId> },
    Sequence { id: NodeId },
}

enum Slot {
    DocumentRoot,
    Item(NodeId),
    Key(NodeId),
    Value(NodeId),
}

#[derive(Default)]
struct TreeBuilder {
    file: YamlFile,
    stack: Vec<Frame>,
    document: Option<NodeId>,
}

impl TreeBuilder {
    fn finish(mut self) -> YamlFile {
        self.close_document(None);
        self.file
    }

    fn open_document(&mut self, start: Position) -> NodeId {
        if let Some(doc) = self.document {
            return doc;
        }
        let doc = self.file.push(Node {
            kind: NodeKind::Document { root: None },
            parent: None,
            start,
            end: start,
        });
        self.file.documents.push(doc);
        self.document = Some(doc);
        doc
    }

    fn close_document(&mut self, end: Option<Position>) {
        if let Some(doc) = self.document.take() {
            if let Some(end) = end {
                self.file.node_mut(doc).end = end;
            }
        }
    }

    fn attach(&mut self, kind: NodeKind, start: Position) -> NodeId {
        let slot = match self.stack.last() {
            None => Slot::DocumentRoot,
            Some(Frame::Sequence { id }) => Slot::Item(*id),
            Some(Frame::Mapping { id, pending: None }) => Slot::Key(*id),
            Some(Frame::Mapping {
                pending: Some(kv), ..
            }) => Slot::Value(*kv),
        };

        match slot {
            Slot::DocumentRoot => {
                let doc = self.open_document(start);
                let id = self.push_child(kind, doc, start);
                if let NodeKind::Document { root } = &mut self.file.node_mut(doc).kind {
                    *root = Some(id);
                }
                id
            }
            Slot::Item(sequence) => {
                let id = self.push_child(kind, sequence, start);
                if let NodeKind::Sequence { items } = &mut self.file.node_mut(sequence).kind {
                    items.push(id);
                }
                id
            }
            Slot::Key(mapping) => {
                // The key node is pushed right after its key-value pair.
                let key = NodeId::new(self.file.len() + 1);
                let kv = self.push_child(NodeKind::KeyValue { key, value: None }, mapping, start);
                let id = self.push_child(kind, kv, start);
                debug_assert_eq!(id, key);

                if let NodeKind::Mapping { entries } = &mut self.file.node_mut(mapping).kind {
                    entries.push(kv);
                }
                if let Some(Frame::Mapping { pending, .. }) = self.stack.last_mut() {
                    *pending = Some(kv);
                }
                id
            }
            Slot::Value(kv) => {
                let id = self.push_child(kind, kv, start);
                if let NodeKind::KeyValue { value, .. } = &mut self.file.node_mut(kv).kind {
                    *value = Some(id);
                }
                if let Some(Frame::Mapping { pending, .. }) = self.stack.last_mut() {
                    *pending = None;
                }
                id
            }
        }
    }

    fn push_child(&mut self, kind: NodeKind, parent: NodeId, start: Position) -> NodeId {
        self.file.push(Node {
            kind,
            parent: Some(parent),
            start,
            end: start,
        })
    }

    fn end_mapping(&mut self, id: NodeId, end: Position) {
        self.file.node_mut(id).end = end;

        let entries = self.file.entries(id).to_vec();
        for (i, &kv) in entries.iter().enumerate() {
            let kv_end = entries
                .get(i + 1)
                .map(|&next| self.file.node(next).start)
                .unwrap_or(end);
            self.file.node_mut(kv).end = kv_end;
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let position = to_position(&mark);
        match ev {
            Event::Scalar(value, ..) => {
                self.attach(NodeKind::Scalar { value }, position);
            }
            Event::Alias(..) => {
                self.attach(NodeKind::Alias, position);
            }
            Event::MappingStart(..) => {
                let id = self.attach(
                    NodeKind::Mapping {
                        entries: Vec::new(),
                    },
                    position,
                );
                self.stack.push(Frame::Mapping { id, pending: None });
            }
            Event::SequenceStart(..) => {
                let id = self.attach(NodeKind::Sequence { items: Vec::new() }, position);
                self.stack.push(Frame::Sequence { id });
            }
            Event::MappingEnd => {
                if let Some(Frame::Mapping { id, .. }) = self.stack.pop() {
                    self.end_mapping(id, position);
                }
            }
            Event::SequenceEnd => {
                if let Some(Frame::Sequence { id }) = self.stack.pop() {
                    self.file.node_mut(id).end = position;
                }
            }
            Event::DocumentEnd | Event::StreamEnd => {
                self.stack.clear();
                self.close_document(Some(position));
            }
            _ => {}
        }
    }
}

fn to_position(mark: &Marker) -> Position {
    Position::new(mark.line() as u32, mark.col() as u32 + 1, mark.index())
}
