//! Linting orchestration.
//!
//! Ties together detection, parsing and the structural validator. Every
//! key-value pair of every document is visited and checked on its own, the
//! way an editor re-runs its annotator for each element.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::config::KubeSchemaConfig;
use super::detect::{self, DiskFile, MemoryFile, SourceFile};
use super::navigator;
use super::parser::{self, NodeKind, YamlFile};
use super::schema::ModelRegistry;
use super::types::{CheckFailure, Diagnostic, DiagnosticSink, Severity, UNKNOWN_PROPERTY};
use super::validator;

/// Nominal path used for content linted without a file.
pub const INLINE_PATH: &str = "<inline>.yaml";

/// Result of linting Kubernetes manifests.
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Unknown properties found.
    pub failures: Vec<CheckFailure>,
    /// Files that could not be read or parsed.
    pub parse_errors: Vec<String>,
    pub summary: LintSummary,
}

/// Summary of a lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    /// Kubernetes files that were checked.
    pub files_checked: usize,
    /// Files skipped because they are not Kubernetes YAML files.
    pub files_skipped: usize,
    /// Documents checked across all files.
    pub documents_checked: usize,
    /// Whether the lint passed (no failures at or above the threshold).
    pub passed: bool,
}

impl LintResult {
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
            parse_errors: Vec::new(),
            summary: LintSummary {
                passed: true,
                ..Default::default()
            },
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.failures.iter().map(|f| f.severity).max()
    }

    /// Check if the results should cause a non-zero exit.
    pub fn should_fail(&self, config: &KubeSchemaConfig) -> bool {
        if config.no_fail {
            return false;
        }
        self.max_severity()
            .is_some_and(|max| max >= config.failure_threshold)
    }

    /// Sort failures by file path and position.
    pub fn sort(&mut self) {
        self.failures.sort();
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: LintResult) {
        self.failures.extend(other.failures);
        self.parse_errors.extend(other.parse_errors);
        self.summary.files_checked += other.summary.files_checked;
        self.summary.files_skipped += other.summary.files_skipped;
        self.summary.documents_checked += other.summary.documents_checked;
    }

    fn finish(mut self, config: &KubeSchemaConfig) -> Self {
        self.sort();
        self.summary.passed = !self.should_fail(config);
        self
    }
}

impl Default for LintResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Lint files and directories.
///
/// Directories are searched recursively for `.yaml`/`.yml` files. Files are
/// linted in parallel against the same registry.
pub fn lint<P: AsRef<Path>>(
    paths: &[P],
    registry: &ModelRegistry,
    config: &KubeSchemaConfig,
) -> LintResult {
    let mut result = LintResult::new();
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if config.should_ignore_path(path) {
            log::debug!("ignoring {}", path.display());
            continue;
        }
        if !path.exists() {
            result
                .parse_errors
                .push(format!("{}: path does not exist", path.display()));
            continue;
        }
        files.extend(collect_files(path, config));
    }

    let results: Vec<LintResult> = files
        .par_iter()
        .map(|file| lint_file(file, registry, config))
        .collect();
    for file_result in results {
        result.merge(file_result);
    }

    result.finish(config)
}

/// Lint a single file.
pub fn lint_file(path: &Path, registry: &ModelRegistry, config: &KubeSchemaConfig) -> LintResult {
    lint_source(&DiskFile::new(path), registry, config)
}

/// Lint YAML content directly.
pub fn lint_content(content: &str, registry: &ModelRegistry, config: &KubeSchemaConfig) -> LintResult {
    lint_source(&MemoryFile::new(INLINE_PATH, content), registry, config)
}

/// Lint any source file.
pub fn lint_source(
    source: &dyn SourceFile,
    registry: &ModelRegistry,
    config: &KubeSchemaConfig,
) -> LintResult {
    let mut result = LintResult::new();
    let path = source.path();

    if !detect::is_kubernetes_file(source) {
        log::debug!("{} is not a Kubernetes YAML file", path.display());
        result.summary.files_skipped = 1;
        return result.finish(config);
    }

    let file = match parser::parse_source(source) {
        Ok(file) => file,
        Err(err) => {
            result.parse_errors.push(format!("{}: {}", path.display(), err));
            return result.finish(config);
        }
    };

    result.summary.files_checked = 1;
    result.summary.documents_checked = file.documents().len();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    annotate(registry, &file, config, &mut diagnostics);

    result.failures = diagnostics
        .into_iter()
        .map(|diagnostic| {
            let resource = navigator::find_resource_key(&file, diagnostic.anchor);
            let failure = CheckFailure::from_diagnostic(UNKNOWN_PROPERTY, diagnostic, path);
            match resource {
                Some(key) => failure.with_resource(key.to_string()),
                None => failure,
            }
        })
        .collect();

    result.finish(config)
}

/// Run the structural check on every node of a parsed file.
///
/// Returns the number of diagnostics reported.
pub fn annotate(
    registry: &ModelRegistry,
    file: &YamlFile,
    config: &KubeSchemaConfig,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let mut reported = 0;
    for node in file.node_ids() {
        match file.kind(node) {
            Some(NodeKind::Document { .. }) if config.check_document_root => {
                reported += validator::validate_document_root(registry, file, node, sink);
            }
            Some(NodeKind::KeyValue { .. }) => {
                reported += validator::validate_property(registry, file, node, sink);
                if config.check_sequence_items {
                    reported += validator::validate_sequence_items(registry, file, node, sink);
                }
            }
            _ => {}
        }
    }
    reported
}

/// YAML files under `path` (or `path` itself if it is a file), sorted and
/// minus ignored paths.
pub fn collect_files(path: &Path, config: &KubeSchemaConfig) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    walkdir::WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| detect::has_yaml_extension(&DiskFile::new(p)))
        .filter(|p| !config.should_ignore_path(p))
        .collect()
}
