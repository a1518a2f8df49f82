//! Resource type identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a Kubernetes resource schema: API group, API version and kind.
///
/// The core API group (`apiVersion: v1`) has no group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceTypeKey {
    pub api_group: Option<String>,
    pub api_version: String,
    pub kind: String,
}

impl ResourceTypeKey {
    /// Create a key; an empty group is normalised to the core group.
    pub fn new(
        api_group: Option<&str>,
        api_version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let api_group = api_group.filter(|g| !g.is_empty()).map(str::to_string);
        Self {
            api_group,
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Build a key from the `apiVersion` and `kind` values of a document.
    ///
    /// `apiVersion` is split on its first `/` into group and version.
    /// Returns `None` if either value is blank.
    pub fn from_fields(api_version: &str, kind: &str) -> Option<Self> {
        let api_version = api_version.trim();
        let kind = kind.trim();
        if api_version.is_empty() || kind.is_empty() {
            return None;
        }

        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (Some(group.trim()), version.trim()),
            None => (None, api_version),
        };
        if version.is_empty() {
            return None;
        }

        Some(Self::new(group, version, kind))
    }

    /// The `apiVersion` string this key was parsed from.
    pub fn api_version_string(&self) -> String {
        match &self.api_group {
            Some(group) => format!("{}/{}", group, self.api_version),
            None => self.api_version.clone(),
        }
    }
}

impl fmt::Display for ResourceTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version_string(), self.kind)
    }
}
