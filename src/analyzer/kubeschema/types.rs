//! Core types for the schema linter.
//!
//! - `Severity` - Finding severity levels
//! - `RuleCode` - Rule identifiers (e.g., "unknown-property")
//! - `Diagnostic` - A finding anchored at a node of the parsed document
//! - `DiagnosticSink` - Where the validator reports diagnostics
//! - `CheckFailure` - A diagnostic enriched with file and resource context

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use super::parser::{NodeId, Position};

/// Rule code for keys the resolved schema does not declare.
pub const UNKNOWN_PROPERTY: &str = "unknown-property";

/// Severity levels for findings.
///
/// Ordered from most severe to least severe:
/// `Error > Warning > Info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Error => 2,
            Self::Warning => 1,
            Self::Info => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A rule identifier (e.g., "unknown-property").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleCode(pub String);

impl RuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A suggested edit, described as data for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fix {
    /// Remove a key-value pair together with its trailing formatting.
    #[serde(rename_all = "camelCase")]
    DeleteProperty {
        /// The key-value node to remove.
        #[serde(skip)]
        target: Option<NodeId>,
        /// The property's key text.
        name: String,
        /// Start of the removed range.
        start: Position,
        /// End of the removed range (exclusive).
        end: Position,
    },
}

impl Fix {
    /// Short human-readable description of the fix.
    pub fn title(&self) -> String {
        match self {
            Self::DeleteProperty { name, .. } => format!("Delete property '{}'", name),
        }
    }
}

/// A finding produced by the structural validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Node the diagnostic is attached to (the offending key).
    pub anchor: NodeId,
    /// Position of the anchor node.
    pub position: Position,
    pub severity: Severity,
    pub message: String,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        anchor: NodeId,
        position: Position,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            anchor,
            position,
            severity,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Receives diagnostics from the validator.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A diagnostic found during linting, with the file and resource it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub code: RuleCode,
    pub severity: Severity,
    pub message: String,
    pub file_path: PathBuf,
    /// Resource type of the enclosing document (e.g., "apps/v1/Deployment").
    pub resource: Option<String>,
    /// Line number (1-indexed).
    pub line: Option<u32>,
    /// Column number (1-indexed).
    pub column: Option<u32>,
    pub fix: Option<Fix>,
}

impl CheckFailure {
    pub fn new(
        code: impl Into<RuleCode>,
        severity: Severity,
        message: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            file_path: file_path.into(),
            resource: None,
            line: None,
            column: None,
            fix: None,
        }
    }

    /// Build a failure from a validator diagnostic.
    pub fn from_diagnostic(
        code: impl Into<RuleCode>,
        diagnostic: Diagnostic,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        let position = diagnostic.position;
        let mut failure = Self::new(code, diagnostic.severity, diagnostic.message, file_path)
            .with_position(position.line, position.column);
        failure.fix = diagnostic.fix;
        failure
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// `file:line:column` location string.
    pub fn location(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                format!("{}:{}:{}", self.file_path.display(), line, column)
            }
            (Some(line), None) => format!("{}:{}", self.file_path.display(), line),
            _ => self.file_path.display().to_string(),
        }
    }
}

impl Ord for CheckFailure {
    fn cmp(&self, other: &Self) -> Ordering {
        // File, then position, then most severe first.
        self.file_path
            .cmp(&other.file_path)
            .then_with(|| match (self.line, other.line) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.column.cmp(&other.column))
            .then_with(|| other.severity.cmp(&self.severity))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl PartialOrd for CheckFailure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
