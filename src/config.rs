//! Audit configuration file (`depaudit.toml`)
//!
//! Every field is optional; a missing file means all defaults.
//!
//! ```toml
//! github_api_url = "https://api.github.com"
//! npm_registry_url = "https://registry.npmjs.org"
//! timeout_secs = 30
//! release_limit = 30
//! tag_limit = 30
//! check_archived = true
//! token_env = "GITHUB_TOKEN"
//! ```

use crate::audit::{EngineOptions, DEFAULT_RELEASE_LIMIT};
use crate::error::ConfigError;
use crate::registry::{DEFAULT_TAG_LIMIT, GITHUB_API_URL, NPM_REGISTRY_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// File name looked up in the audited directory
pub const CONFIG_FILENAME: &str = "depaudit.toml";

/// Audit settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    #[serde(default = "default_npm_registry_url")]
    pub npm_registry_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Releases listed per outdated dependency
    #[serde(default = "default_limit")]
    pub release_limit: usize,

    /// Tags examined for repositories without releases
    #[serde(default = "default_tag_limit")]
    pub tag_limit: usize,

    #[serde(default = "default_true")]
    pub check_archived: bool,

    /// Environment variable holding the GitHub token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            npm_registry_url: default_npm_registry_url(),
            timeout_secs: default_timeout_secs(),
            release_limit: default_limit(),
            tag_limit: default_tag_limit(),
            check_archived: default_true(),
            token_env: default_token_env(),
        }
    }
}

fn default_github_api_url() -> String {
    GITHUB_API_URL.to_string()
}

fn default_npm_registry_url() -> String {
    NPM_REGISTRY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_limit() -> usize {
    DEFAULT_RELEASE_LIMIT
}

fn default_tag_limit() -> usize {
    DEFAULT_TAG_LIMIT
}

fn default_true() -> bool {
    true
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl AuditConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.timeout_secs == 0 {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                message: "timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve configuration for a run: an explicit file must exist, otherwise
    /// `depaudit.toml` next to the target is used when present
    pub fn resolve(explicit: Option<&Path>, target: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("loading config from {}", path.display());
            return Self::load_from(path);
        }

        let candidate = default_location(target);
        if candidate.is_file() {
            debug!("loading config from {}", candidate.display());
            Self::load_from(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Engine options derived from this configuration
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            release_limit: self.release_limit,
            check_archived: self.check_archived,
        }
    }

    /// GitHub token from the configured environment variable
    pub fn github_token(&self) -> Option<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
            _ => {
                warn!(
                    "{} is not set; GitHub requests are unauthenticated and heavily rate limited",
                    self.token_env
                );
                None
            }
        }
    }
}

/// Config file location for a target file or directory
fn default_location(target: &Path) -> PathBuf {
    let dir = if target.is_file() {
        target.parent().unwrap_or_else(|| Path::new("."))
    } else {
        target
    };
    dir.join(CONFIG_FILENAME)
}
