//! Structured reference to an upstream source repository

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host assumed when a URL names only `owner/repo`
pub const DEFAULT_HOST: &str = "github.com";

/// Owner/repo pair, carried from resolution through to rendering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Recognized host (`github.com`, `gitlab.com`), if the URL named one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Creates a reference without an explicit host
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            host: None,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Sets the host (builder pattern)
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Host used for links
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Returns true if the repository lives on GitHub
    pub fn is_github(&self) -> bool {
        self.host().eq_ignore_ascii_case(DEFAULT_HOST)
    }

    /// Repository home page
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host(), self.owner, self.repo)
    }

    /// Page of a single release
    pub fn release_url(&self, tag: &str) -> String {
        format!("{}/releases/tag/{}", self.web_url(), tag)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
