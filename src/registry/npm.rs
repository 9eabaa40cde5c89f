//! npm Registry adapter
//!
//! Fetches the latest published version of a package from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}/latest
//!
//! Release notes and repository metadata come from the repository the
//! package declares, through the GitHub adapter.

use crate::domain::{DependencyEntry, RepoRef};
use crate::error::AuditError;
use crate::registry::{
    parse_repo_url, GitHubSource, HttpClient, Release, RepoMetadata, UpstreamResolver,
    UpstreamVersionInfo,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

const UPSTREAM: &str = "npm";

/// npm Registry adapter
#[derive(Clone)]
pub struct NpmRegistrySource {
    client: HttpClient,
    base_url: String,
    github: GitHubSource,
}

/// Manifest of the latest published version
#[derive(Debug, Deserialize)]
struct NpmLatestResponse {
    version: String,
    #[serde(default)]
    repository: Option<NpmRepository>,
    #[serde(default)]
    deprecated: Option<serde_json::Value>,
}

/// `repository` is either a shorthand string or an object with a url
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Shorthand(String),
    Detailed {
        #[serde(default)]
        url: Option<String>,
    },
}

impl NpmRepository {
    fn url(&self) -> Option<&str> {
        match self {
            NpmRepository::Shorthand(url) => Some(url),
            NpmRepository::Detailed { url } => url.as_deref(),
        }
    }
}

/// Latest version as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmLatest {
    pub version: String,
    /// Declared repository URL, verbatim
    pub repository_url: Option<String>,
    pub deprecated: bool,
}

impl NpmRegistrySource {
    /// Create a new npm adapter against the public registry
    pub fn new(client: HttpClient, github: GitHubSource) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL, github)
    }

    /// Create a new npm adapter against a custom registry
    pub fn with_base_url(
        client: HttpClient,
        base_url: impl Into<String>,
        github: GitHubSource,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            github,
        }
    }

    /// Build the URL for a package's latest version
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/latest", self.base_url, package)
    }

    /// Latest version, declared repository and deprecation marker
    pub async fn registry_latest(&self, package: &str) -> Result<NpmLatest, AuditError> {
        let url = self.build_url(package);
        let response: NpmLatestResponse = self
            .client
            .send_json(self.client.get(&url), package, UPSTREAM)
            .await?;

        Ok(NpmLatest {
            version: response.version,
            repository_url: response
                .repository
                .as_ref()
                .and_then(NpmRepository::url)
                .map(str::to_string),
            deprecated: is_deprecated(response.deprecated.as_ref()),
        })
    }
}

/// The registry sets `deprecated` to a message string (or occasionally `true`)
fn is_deprecated(marker: Option<&serde_json::Value>) -> bool {
    match marker {
        Some(serde_json::Value::String(message)) => !message.is_empty(),
        Some(serde_json::Value::Bool(flag)) => *flag,
        _ => false,
    }
}

#[async_trait]
impl UpstreamResolver for NpmRegistrySource {
    fn upstream_name(&self) -> &'static str {
        UPSTREAM
    }

    async fn resolve_latest(
        &self,
        entry: &DependencyEntry,
    ) -> Result<UpstreamVersionInfo, AuditError> {
        let latest = self.registry_latest(&entry.name).await?;

        let repo = latest
            .repository_url
            .as_deref()
            .and_then(parse_repo_url)
            .filter(RepoRef::is_github);
        if repo.is_none() {
            debug!(
                "{}: no usable repository link ({:?})",
                entry.name, latest.repository_url
            );
        }

        Ok(UpstreamVersionInfo::new(latest.version)
            .with_repo(repo)
            .with_deprecated(latest.deprecated))
    }

    async fn list_releases(
        &self,
        repo: &RepoRef,
        limit: usize,
    ) -> Result<Vec<Release>, AuditError> {
        self.github.list_releases(repo, limit).await
    }

    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, AuditError> {
        self.github.repo_metadata(repo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Server, ServerGuard};

    fn adapter(npm: &ServerGuard, github: &ServerGuard) -> NpmRegistrySource {
        let client = HttpClient::new().unwrap();
        let github = GitHubSource::with_base_url(client.clone(), github.url());
        NpmRegistrySource::with_base_url(client, npm.url(), github)
    }

    #[test]
    fn test_npm_adapter_upstream_name() {
        let client = HttpClient::new().unwrap();
        let source = NpmRegistrySource::new(client.clone(), GitHubSource::new(client));
        assert_eq!(source.upstream_name(), "npm");
    }

    #[test]
    fn test_build_url() {
        let client = HttpClient::new().unwrap();
        let source = NpmRegistrySource::new(client.clone(), GitHubSource::new(client));
        assert_eq!(
            source.build_url("lodash"),
            "https://registry.npmjs.org/lodash/latest"
        );
        assert_eq!(
            source.build_url("@types/node"),
            "https://registry.npmjs.org/@types/node/latest"
        );
    }

    #[test]
    fn test_is_deprecated() {
        assert!(is_deprecated(Some(&serde_json::json!("use other-pkg"))));
        assert!(is_deprecated(Some(&serde_json::json!(true))));
        assert!(!is_deprecated(Some(&serde_json::json!(""))));
        assert!(!is_deprecated(Some(&serde_json::json!(false))));
        assert!(!is_deprecated(None));
    }

    #[tokio::test]
    async fn test_resolve_latest_with_repository_object() {
        let mut npm = Server::new_async().await;
        let github = Server::new_async().await;
        let mock = npm
            .mock("GET", "/widget/latest")
            .with_status(200)
            .with_body(
                r#"{
                    "name": "widget",
                    "version": "2.1.0",
                    "repository": {"type": "git", "url": "git+https://github.com/acme/widget.git"}
                }"#,
            )
            .create_async()
            .await;

        let entry = DependencyEntry::new("widget", "^2.0.0");
        let info = adapter(&npm, &github).resolve_latest(&entry).await.unwrap();

        mock.assert_async().await;
        assert_eq!(info.latest, "2.1.0");
        assert_eq!(info.repo, Some(RepoRef::new("acme", "widget")));
        assert!(!info.deprecated);
        assert!(info.release.is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_with_shorthand_and_deprecation() {
        let mut npm = Server::new_async().await;
        let github = Server::new_async().await;
        let _mock = npm
            .mock("GET", "/old-widget/latest")
            .with_status(200)
            .with_body(
                r#"{"version": "1.0.0", "repository": "github:acme/old-widget", "deprecated": "use widget"}"#,
            )
            .create_async()
            .await;

        let entry = DependencyEntry::new("old-widget", "1.0.0");
        let info = adapter(&npm, &github).resolve_latest(&entry).await.unwrap();

        assert_eq!(info.repo.unwrap().slug(), "acme/old-widget");
        assert!(info.deprecated);
    }

    #[tokio::test]
    async fn test_resolve_latest_without_repository() {
        let mut npm = Server::new_async().await;
        let github = Server::new_async().await;
        let _mock = npm
            .mock("GET", "/lonely/latest")
            .with_status(200)
            .with_body(r#"{"version": "0.3.0"}"#)
            .create_async()
            .await;

        let info = adapter(&npm, &github)
            .resolve_latest(&DependencyEntry::new("lonely", "0.2.0"))
            .await
            .unwrap();

        assert_eq!(info.latest, "0.3.0");
        assert!(info.repo.is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_gitlab_repository_is_dropped() {
        let mut npm = Server::new_async().await;
        let mut github = Server::new_async().await;
        let _mock = npm
            .mock("GET", "/widget/latest")
            .with_status(200)
            .with_body(
                r#"{"version": "2.1.0", "repository": {"url": "git+https://gitlab.com/acme/widget.git"}}"#,
            )
            .create_async()
            .await;
        let github_mock = github
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let info = adapter(&npm, &github)
            .resolve_latest(&DependencyEntry::new("widget", "2.0.0"))
            .await
            .unwrap();

        github_mock.assert_async().await;
        assert_eq!(info.latest, "2.1.0");
        assert!(info.repo.is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_unknown_package() {
        let mut npm = Server::new_async().await;
        let github = Server::new_async().await;
        let _mock = npm
            .mock("GET", "/no-such-package/latest")
            .with_status(404)
            .create_async()
            .await;

        let err = adapter(&npm, &github)
            .resolve_latest(&DependencyEntry::new("no-such-package", "1.0.0"))
            .await
            .unwrap_err();

        assert_eq!(err, AuditError::not_found("no-such-package", "npm"));
    }

    #[tokio::test]
    async fn test_changelog_delegates_to_github() {
        let npm = Server::new_async().await;
        let mut github = Server::new_async().await;
        let mock = github
            .mock("GET", "/repos/acme/widget/releases")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"tag_name": "v2.1.0", "name": "2.1.0", "body": "notes"}]"#)
            .create_async()
            .await;

        let releases = adapter(&npm, &github)
            .list_releases(&RepoRef::new("acme", "widget"), 30)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag, "v2.1.0");
    }
}
