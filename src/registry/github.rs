//! GitHub adapter
//!
//! Resolves latest versions and release notes from the GitHub REST API.
//! API endpoints:
//! - https://api.github.com/repos/{owner}/{repo}/releases/latest
//! - https://api.github.com/repos/{owner}/{repo}/releases?per_page={n}
//! - https://api.github.com/repos/{owner}/{repo}/tags?per_page={n}
//! - https://api.github.com/repos/{owner}/{repo}
//!
//! Repositories without a published release fall back to their tags.

use crate::domain::{greatest_tag, DependencyEntry, RepoRef};
use crate::error::AuditError;
use crate::registry::{
    parse_repo_url, HttpClient, Release, RepoMetadata, UpstreamResolver, UpstreamVersionInfo,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde::Deserialize;
use tracing::debug;

/// GitHub REST API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Tags examined when a repository has no release
pub const DEFAULT_TAG_LIMIT: usize = 30;

/// GitHub caps `per_page` at 100
const MAX_PER_PAGE: usize = 100;

const UPSTREAM: &str = "GitHub";

/// GitHub adapter
#[derive(Clone)]
pub struct GitHubSource {
    client: HttpClient,
    base_url: String,
    token: Option<String>,
    tag_limit: usize,
}

/// Release object
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    draft: bool,
}

impl From<GitHubRelease> for Release {
    fn from(release: GitHubRelease) -> Self {
        Release {
            tag: release.tag_name,
            title: release.name.filter(|n| !n.is_empty()),
            body: release.body,
        }
    }
}

/// Tag object (only the name is used)
#[derive(Debug, Deserialize)]
struct GitHubTag {
    name: String,
}

/// Repository object (only the archived flag is used)
#[derive(Debug, Deserialize)]
struct GitHubRepo {
    #[serde(default)]
    archived: bool,
}

impl GitHubSource {
    /// Create a new GitHub adapter against the public API
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GITHUB_API_URL)
    }

    /// Create a new GitHub adapter against a custom API root
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            tag_limit: DEFAULT_TAG_LIMIT,
        }
    }

    /// Sets the access token (builder pattern)
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Sets how many tags the fallback examines (builder pattern)
    pub fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = limit;
        self
    }

    /// Returns true if requests are authenticated
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Repositories hosted elsewhere cannot be queried through this API
    fn ensure_github(repo: &RepoRef) -> Result<(), AuditError> {
        if repo.is_github() {
            Ok(())
        } else {
            Err(AuditError::source_unresolvable(Some(&repo.web_url())))
        }
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.repo)
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Latest published release of a repository
    pub async fn latest_release(&self, repo: &RepoRef) -> Result<Release, AuditError> {
        let url = format!("{}/releases/latest", self.repo_url(repo));
        let release: GitHubRelease = self
            .client
            .send_json(self.request(&url), &repo.slug(), UPSTREAM)
            .await?;
        Ok(release.into())
    }

    /// Most recent tag names of a repository
    pub async fn list_tags(&self, repo: &RepoRef, limit: usize) -> Result<Vec<String>, AuditError> {
        let url = format!(
            "{}/tags?per_page={}",
            self.repo_url(repo),
            limit.clamp(1, MAX_PER_PAGE)
        );
        let tags: Vec<GitHubTag> = self
            .client
            .send_json(self.request(&url), &repo.slug(), UPSTREAM)
            .await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    /// Latest version of a repository: its latest release, or on 404 its
    /// greatest semantic version tag
    pub async fn resolve_repo(&self, repo: &RepoRef) -> Result<UpstreamVersionInfo, AuditError> {
        Self::ensure_github(repo)?;
        match self.latest_release(repo).await {
            Ok(release) => Ok(UpstreamVersionInfo::new(release.tag.clone())
                .with_release(release)
                .with_repo(Some(repo.clone()))),
            Err(e) if e.is_not_found() => {
                debug!("{} has no release, falling back to tags", repo);
                let tags = self.list_tags(repo, self.tag_limit).await?;
                let latest = greatest_tag(tags.iter().map(String::as_str))
                    .ok_or_else(|| AuditError::no_releases(repo.slug()))?;
                Ok(UpstreamVersionInfo::new(latest).with_repo(Some(repo.clone())))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl UpstreamResolver for GitHubSource {
    fn upstream_name(&self) -> &'static str {
        UPSTREAM
    }

    async fn resolve_latest(
        &self,
        entry: &DependencyEntry,
    ) -> Result<UpstreamVersionInfo, AuditError> {
        let url = entry.source_url.as_deref();
        let repo = url
            .and_then(parse_repo_url)
            .ok_or_else(|| AuditError::source_unresolvable(url))?;
        self.resolve_repo(&repo).await
    }

    async fn list_releases(
        &self,
        repo: &RepoRef,
        limit: usize,
    ) -> Result<Vec<Release>, AuditError> {
        Self::ensure_github(repo)?;
        let url = format!(
            "{}/releases?per_page={}",
            self.repo_url(repo),
            limit.clamp(1, MAX_PER_PAGE)
        );
        let releases: Vec<GitHubRelease> = self
            .client
            .send_json(self.request(&url), &repo.slug(), UPSTREAM)
            .await?;
        Ok(releases
            .into_iter()
            .filter(|r| !r.draft)
            .map(Release::from)
            .collect())
    }

    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, AuditError> {
        Self::ensure_github(repo)?;
        let url = self.repo_url(repo);
        let meta: GitHubRepo = self
            .client
            .send_json(self.request(&url), &repo.slug(), UPSTREAM)
            .await?;
        Ok(RepoMetadata {
            archived: meta.archived,
        })
    }
}
