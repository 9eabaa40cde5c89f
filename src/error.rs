//! Application error types using thiserror
//!
//! Error hierarchy:
//! - AuditError: per-dependency reconciliation failures (recorded on reports)
//! - ManifestError: Issues with manifest file loading
//! - ConfigError: Issues with CLI or config file settings
//! - IoError: Missing audit targets

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Failures while reconciling a single dependency against its upstream.
///
/// These never abort an audit: the engine turns them into the `message` of
/// an error report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Current version does not parse as a semantic version
    #[error("invalid current version '{version}'")]
    InvalidVersion { version: String },

    /// Transport failure or unexpected upstream response
    #[error("failed to reach {upstream} for '{target}': {message}")]
    UpstreamUnreachable {
        target: String,
        upstream: String,
        message: String,
    },

    /// Upstream quota exhausted; `reset` is shown to the operator as-is
    #[error("{upstream} rate limit exceeded for '{target}'; try again after {reset}")]
    UpstreamRateLimited {
        target: String,
        upstream: String,
        reset: String,
    },

    /// Upstream answered 404
    #[error("'{target}' not found on {upstream}")]
    UpstreamNotFound { target: String, upstream: String },

    /// No owner/repo could be extracted from the source URL
    #[error("no upstream repository could be resolved from {}", describe_url(.url))]
    SourceUnresolvable { url: Option<String> },

    /// Neither a release nor a semantic version tag exists
    #[error("no releases or semantic version tags found for '{target}'")]
    NoReleasesFound { target: String },
}

fn describe_url(url: &Option<String>) -> String {
    match url {
        Some(url) => format!("'{}'", url),
        None => "a missing source URL".to_string(),
    }
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest content could not be interpreted
    #[error("failed to parse {kind}: {message}")]
    ParseError { kind: String, message: String },

    /// Unsupported manifest format
    #[error("unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}

impl AuditError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        AuditError::InvalidVersion {
            version: version.into(),
        }
    }

    /// Creates a new UpstreamUnreachable error
    pub fn unreachable(
        target: impl Into<String>,
        upstream: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AuditError::UpstreamUnreachable {
            target: target.into(),
            upstream: upstream.into(),
            message: message.into(),
        }
    }

    /// Creates a new UpstreamRateLimited error
    pub fn rate_limited(
        target: impl Into<String>,
        upstream: impl Into<String>,
        reset: impl Into<String>,
    ) -> Self {
        AuditError::UpstreamRateLimited {
            target: target.into(),
            upstream: upstream.into(),
            reset: reset.into(),
        }
    }

    /// Creates a new UpstreamNotFound error
    pub fn not_found(target: impl Into<String>, upstream: impl Into<String>) -> Self {
        AuditError::UpstreamNotFound {
            target: target.into(),
            upstream: upstream.into(),
        }
    }

    /// Creates a new SourceUnresolvable error
    pub fn source_unresolvable(url: Option<&str>) -> Self {
        AuditError::SourceUnresolvable {
            url: url.map(str::to_string),
        }
    }

    /// Creates a new NoReleasesFound error
    pub fn no_releases(target: impl Into<String>) -> Self {
        AuditError::NoReleasesFound {
            target: target.into(),
        }
    }

    /// Returns true for a 404 answer, the only failure that allows tag fallback
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuditError::UpstreamNotFound { .. })
    }

    /// Returns true if the upstream quota was exhausted
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AuditError::UpstreamRateLimited { .. })
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        ManifestError::ParseError {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Creates a new UnsupportedFormat error
    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        ManifestError::UnsupportedFormat { path: path.into() }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }
}
