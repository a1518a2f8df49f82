//! Kubernetes manifest detection by content sniffing.
//!
//! A file is a Kubernetes YAML file when its extension is `yml` or `yaml`
//! and one of the lines within its first [`BYTES_TO_READ`] bytes starts with
//! `kind: ` or `apiVersion: `. Stub files (placeholders for files that are
//! about to be created) always match.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use super::guard::RecursionGuard;

/// How much of a file is inspected.
pub const BYTES_TO_READ: u64 = 4096;

const LINE_PREFIXES: &[&str] = &["kind: ", "apiVersion: "];
const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

static DETECTION_GUARD: RecursionGuard = RecursionGuard::new("KubernetesYamlFileType");

/// A file that can be checked for Kubernetes content.
pub trait SourceFile {
    /// Path used for display and extension checks.
    fn path(&self) -> &Path;

    /// Placeholder for a file that does not exist yet.
    fn is_stub(&self) -> bool {
        false
    }

    /// Open the file's content for reading.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;

    fn extension(&self) -> Option<&str> {
        self.path().extension().and_then(|e| e.to_str())
    }
}

/// A file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
}

impl DiskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceFile for DiskFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

/// In-memory content with a nominal path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    path: PathBuf,
    content: Vec<u8>,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl SourceFile for MemoryFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.content.as_slice())))
    }
}

/// A placeholder for a file being created, with no content yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFile {
    path: PathBuf,
}

impl StubFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceFile for StubFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_stub(&self) -> bool {
        true
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(io::empty()))
    }
}

/// Whether the file's extension is `yml` or `yaml` (case-insensitive).
pub fn has_yaml_extension(file: &dyn SourceFile) -> bool {
    file.extension()
        .is_some_and(|ext| YAML_EXTENSIONS.iter().any(|y| ext.eq_ignore_ascii_case(y)))
}

/// Whether `file` is a Kubernetes YAML file.
///
/// Never fails: unreadable files do not match. A detection triggered from
/// within another detection on the same thread does not match either.
pub fn is_kubernetes_file(file: &dyn SourceFile) -> bool {
    if !has_yaml_extension(file) {
        return false;
    }
    if file.is_stub() {
        return true;
    }

    DETECTION_GUARD.do_preventing_recursion(DETECTION_GUARD.id(), false, || {
        match read_head(file) {
            Ok(head) => contains_kubernetes_marker(&head),
            Err(err) => {
                log::debug!("could not read {}: {}", file.path().display(), err);
                false
            }
        }
    })
}

/// Whether the file at `path` is a Kubernetes YAML file.
pub fn is_kubernetes_yaml(path: &Path) -> bool {
    is_kubernetes_file(&DiskFile::new(path))
}

fn read_head(file: &dyn SourceFile) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(BYTES_TO_READ as usize);
    file.open()?.take(BYTES_TO_READ).read_to_end(&mut head)?;
    Ok(head)
}

/// Whether some line of `bytes` starts with `kind: ` or `apiVersion: `.
///
/// The last line counts even without a terminator.
pub fn contains_kubernetes_marker(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(text.as_ref());
    text.split(['\n', '\r'])
        .any(|line| LINE_PREFIXES.iter().any(|prefix| line.starts_with(prefix)))
}
