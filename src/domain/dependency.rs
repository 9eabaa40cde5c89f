//! Dependency entries produced by manifest loaders

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency as declared in a manifest, before any upstream lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// Package or repository name
    pub name: String,
    /// Version exactly as written in the manifest (e.g. `^1.2.3`, `v2.0.0`)
    pub version: String,
    /// Where the upstream source lives, when the manifest declares it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl DependencyEntry {
    /// Creates a new entry without a source URL
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source_url: None,
        }
    }

    /// Sets the source URL (builder pattern)
    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
