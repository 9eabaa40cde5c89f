//! Upstream adapters for fetching version truth
//!
//! This module provides:
//! - HTTP client shared foundation (single attempt, rate-limit detection)
//! - Source URL parsing into owner/repo references
//! - GitHub adapter (releases, tags, repository metadata)
//! - npm Registry adapter (latest version, declared repository)

mod client;
mod github;
mod npm;
mod source_url;

pub use client::{rate_limit_reset, HttpClient, DEFAULT_USER_AGENT};
pub use github::{GitHubSource, DEFAULT_TAG_LIMIT, GITHUB_API_URL};
pub use npm::{NpmLatest, NpmRegistrySource, NPM_REGISTRY_URL};
pub use source_url::parse_repo_url;

use crate::domain::{DependencyEntry, RepoRef};
use crate::error::AuditError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A published release and its notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at (e.g. `v1.3.0`, `pkg@1.3.0`)
    pub tag: String,
    /// Release title
    pub title: Option<String>,
    /// Release notes (markdown)
    pub body: Option<String>,
}

impl Release {
    /// Creates a release without title or notes
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            title: None,
            body: None,
        }
    }

    /// Sets the title (builder pattern)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the notes (builder pattern)
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Repository metadata relevant to the audit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// Repository is read-only / unmaintained
    pub archived: bool,
}

/// Latest version information for one dependency, valid for one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamVersionInfo {
    /// Latest version exactly as published (tag name or registry version)
    pub latest: String,
    /// Release the version came from, when resolved through releases
    pub release: Option<Release>,
    /// Repository used for changelog and metadata lookups
    pub repo: Option<RepoRef>,
    /// Registry marks the package as deprecated
    pub deprecated: bool,
}

impl UpstreamVersionInfo {
    /// Creates info for a bare version string
    pub fn new(latest: impl Into<String>) -> Self {
        Self {
            latest: latest.into(),
            release: None,
            repo: None,
            deprecated: false,
        }
    }

    /// Sets the release (builder pattern)
    pub fn with_release(mut self, release: Release) -> Self {
        self.release = Some(release);
        self
    }

    /// Sets the repository (builder pattern)
    pub fn with_repo(mut self, repo: Option<RepoRef>) -> Self {
        self.repo = repo;
        self
    }

    /// Sets the deprecated marker (builder pattern)
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }
}

/// Capabilities the reconciliation engine needs from an upstream
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    /// Get the upstream name, used in messages
    fn upstream_name(&self) -> &'static str;

    /// Resolve the latest published version of a dependency
    async fn resolve_latest(
        &self,
        entry: &DependencyEntry,
    ) -> Result<UpstreamVersionInfo, AuditError>;

    /// List recent releases of a repository, newest first
    async fn list_releases(&self, repo: &RepoRef, limit: usize)
        -> Result<Vec<Release>, AuditError>;

    /// Fetch repository metadata
    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, AuditError>;
}
