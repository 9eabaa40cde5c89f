//! Per-dependency audit outcome

use super::RepoRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker rendered for an absent version or changelog
pub const ABSENT: &str = "N/A";

/// Final classification of a dependency.
///
/// Variants are declared in precedence order, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Upstream is archived/deprecated and a newer version exists
    DeprecatedUpdateNeeded,
    /// Upstream is archived/deprecated, current version is the latest
    DeprecatedUpToDate,
    /// A skipped release mentions a security fix
    SecurityUrgent,
    /// Newer version exists but its release notes could not be read
    UpdateRecommendedChangelogUnavailable,
    /// Newer version exists
    UpdateRecommended,
    /// Current version is the latest (or not comparable to it)
    UpToDate,
    /// Evaluation failed; see the report message
    Error,
}

impl AuditStatus {
    /// Apply the status precedence to the facts gathered for a dependency
    pub fn classify(
        update_needed: bool,
        archived: bool,
        security_patch: bool,
        changelog_available: bool,
    ) -> Self {
        if archived && update_needed {
            AuditStatus::DeprecatedUpdateNeeded
        } else if archived {
            AuditStatus::DeprecatedUpToDate
        } else if security_patch {
            AuditStatus::SecurityUrgent
        } else if update_needed && !changelog_available {
            AuditStatus::UpdateRecommendedChangelogUnavailable
        } else if update_needed {
            AuditStatus::UpdateRecommended
        } else {
            AuditStatus::UpToDate
        }
    }

    /// Plain label
    pub fn label(&self) -> &'static str {
        match self {
            AuditStatus::DeprecatedUpdateNeeded => "DEPRECATED (Update Needed)",
            AuditStatus::DeprecatedUpToDate => "DEPRECATED (Up to date)",
            AuditStatus::SecurityUrgent => "URGENT Update Required (Security Patch!)",
            AuditStatus::UpdateRecommendedChangelogUnavailable => {
                "Update Recommended (Changelog unavailable)"
            }
            AuditStatus::UpdateRecommended => "Update Recommended",
            AuditStatus::UpToDate => "Up to date",
            AuditStatus::Error => "Error",
        }
    }

    /// Label with a leading emoji, used in markdown
    pub fn badge(&self) -> String {
        let icon = match self {
            AuditStatus::DeprecatedUpdateNeeded | AuditStatus::DeprecatedUpToDate => "⛔️",
            AuditStatus::SecurityUrgent => "🚨",
            AuditStatus::UpdateRecommendedChangelogUnavailable
            | AuditStatus::UpdateRecommended => "🔄",
            AuditStatus::UpToDate => "✅",
            AuditStatus::Error => "❌",
        };
        format!("{} {}", icon, self.label())
    }

    /// Returns true for the deprecated variants
    pub fn is_deprecated(&self) -> bool {
        matches!(
            self,
            AuditStatus::DeprecatedUpdateNeeded | AuditStatus::DeprecatedUpToDate
        )
    }

    /// All statuses in precedence order
    pub fn all() -> &'static [AuditStatus] {
        &[
            AuditStatus::DeprecatedUpdateNeeded,
            AuditStatus::DeprecatedUpToDate,
            AuditStatus::SecurityUrgent,
            AuditStatus::UpdateRecommendedChangelogUnavailable,
            AuditStatus::UpdateRecommended,
            AuditStatus::UpToDate,
            AuditStatus::Error,
        ]
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Audit result for one dependency entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub name: String,
    /// Current version in display form (no canonical prefix)
    pub current_version: String,
    /// Latest upstream version in display form
    pub latest_version: Option<String>,
    pub update_needed: bool,
    pub security_patch: bool,
    pub archived: bool,
    pub status: AuditStatus,
    /// Bounded excerpt of the newest skipped release's notes
    pub changelog: Option<String>,
    pub source_link: Option<String>,
    pub repo: Option<RepoRef>,
    /// Error or warning text, kept verbatim
    pub message: Option<String>,
}

impl DependencyReport {
    /// Creates an error report
    pub fn error(
        name: impl Into<String>,
        current_version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            latest_version: None,
            update_needed: false,
            security_patch: false,
            archived: false,
            status: AuditStatus::Error,
            changelog: None,
            source_link: None,
            repo: None,
            message: Some(message.into()),
        }
    }

    /// Attach the resolved repository and its home page link
    pub fn with_repo(mut self, repo: Option<RepoRef>) -> Self {
        if self.source_link.is_none() {
            self.source_link = repo.as_ref().map(RepoRef::web_url);
        }
        self.repo = repo;
        self
    }

    /// Returns true if evaluation failed
    pub fn is_error(&self) -> bool {
        self.status == AuditStatus::Error
    }

    /// Latest version or the absence marker
    pub fn latest_display(&self) -> &str {
        self.latest_version.as_deref().unwrap_or(ABSENT)
    }

    /// Changelog excerpt or the absence marker
    pub fn changelog_display(&self) -> &str {
        self.changelog.as_deref().unwrap_or(ABSENT)
    }
}

impl fmt::Display for DependencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {} ({})",
            self.name,
            self.current_version,
            self.latest_display(),
            self.status
        )
    }
}
