//! Configuration for the schema linter.
//!
//! Loaded from `.kube-schema-lint.yaml` (or `.yml`) in the working
//! directory, or from an explicit file. Keys are camelCase:
//!
//! ```yaml
//! schemaPaths:
//!   - schemas/
//! ignorePaths:
//!   - "**/charts/**"
//! failureThreshold: warning
//! noFail: false
//! checkDocumentRoot: true
//! checkSequenceItems: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::types::Severity;

pub const DEFAULT_CONFIG_FILES: &[&str] = &[".kube-schema-lint.yaml", ".kube-schema-lint.yml"];

/// Configuration for the schema linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeSchemaConfig {
    /// Schema files or directories of swagger JSON files.
    #[serde(default)]
    pub schema_paths: Vec<PathBuf>,

    /// Glob patterns for paths to ignore.
    #[serde(default)]
    pub ignore_paths: Vec<String>,

    /// Minimum severity that makes the run fail.
    #[serde(default)]
    pub failure_threshold: Severity,

    /// If true, never return a non-zero exit code.
    #[serde(default)]
    pub no_fail: bool,

    /// Check the keys of each document's root mapping.
    #[serde(default = "default_true")]
    pub check_document_root: bool,

    /// Check mapping items of sequences (e.g. each container).
    #[serde(default = "default_true")]
    pub check_sequence_items: bool,
}

fn default_true() -> bool {
    true
}

impl Default for KubeSchemaConfig {
    fn default() -> Self {
        Self {
            schema_paths: Vec::new(),
            ignore_paths: Vec::new(),
            failure_threshold: Severity::Warning,
            no_fail: false,
            check_document_root: true,
            check_sequence_items: true,
        }
    }
}

impl KubeSchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema file or directory.
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_paths.push(path.into());
        self
    }

    /// Add a path pattern to ignore.
    pub fn ignore_path(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_paths.push(pattern.into());
        self
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_no_fail(mut self, no_fail: bool) -> Self {
        self.no_fail = no_fail;
        self
    }

    /// Only check mappings reached through a key-value pair.
    pub fn properties_only(mut self) -> Self {
        self.check_document_root = false;
        self.check_sequence_items = false;
        self
    }

    /// Check if a path matches one of the ignore patterns.
    pub fn should_ignore_path(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.ignore_paths.iter().any(|pattern| {
            glob::Pattern::new(pattern).is_ok_and(|glob| glob.matches(&path_str))
                || path_str.contains(pattern.as_str())
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load the first default config file found in `dir`.
    ///
    /// A file that exists but cannot be loaded is reported and skipped.
    pub fn load_from_dir(dir: &Path) -> Option<Self> {
        for filename in DEFAULT_CONFIG_FILES {
            let path = dir.join(filename);
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    log::debug!("loaded config from {}", path.display());
                    return Some(config);
                }
                Err(err) => log::warn!("ignoring {}: {}", path.display(), err),
            }
        }
        None
    }

    /// Load the default config file from the working directory.
    pub fn load_from_default() -> Option<Self> {
        Self::load_from_dir(Path::new("."))
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
