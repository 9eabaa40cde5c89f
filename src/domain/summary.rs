//! Audit result summary types
//!
//! Provides structures for tracking audit results at file and overall levels.

use super::{AuditStatus, DependencyReport, ManifestKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name and version of the audited project, when the manifest declares them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Audit result for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestAudit {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Format of this manifest
    pub kind: ManifestKind,
    /// Project metadata from the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectInfo>,
    /// Reports in manifest order
    pub reports: Vec<DependencyReport>,
}

impl ManifestAudit {
    /// Creates a new ManifestAudit
    pub fn new(path: impl Into<PathBuf>, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            kind,
            project: None,
            reports: Vec::new(),
        }
    }

    /// Sets the project metadata (builder pattern)
    pub fn with_project(mut self, project: Option<ProjectInfo>) -> Self {
        self.project = project;
        self
    }

    /// Adds a report
    pub fn add_report(&mut self, report: DependencyReport) {
        self.reports.push(report);
    }

    /// Number of reports with the given status
    pub fn count(&self, status: AuditStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    /// Number of dependencies with a newer upstream version
    pub fn update_count(&self) -> usize {
        self.reports.iter().filter(|r| r.update_needed).count()
    }

    /// Number of failed evaluations
    pub fn error_count(&self) -> usize {
        self.count(AuditStatus::Error)
    }

    /// Returns true if any dependency needs attention
    pub fn needs_attention(&self) -> bool {
        self.reports
            .iter()
            .any(|r| r.update_needed || r.archived || r.is_error())
    }
}

/// Overall summary of one audit run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Results for each manifest file processed
    pub manifests: Vec<ManifestAudit>,
}

impl AuditSummary {
    /// Creates a new AuditSummary
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a manifest result
    pub fn add_manifest(&mut self, manifest: ManifestAudit) {
        self.manifests.push(manifest);
    }

    /// Returns the total number of manifests processed
    pub fn manifests_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the total number of dependencies audited
    pub fn total_dependencies(&self) -> usize {
        self.manifests.iter().map(|m| m.reports.len()).sum()
    }

    /// Total count of a status across manifests
    pub fn count(&self, status: AuditStatus) -> usize {
        self.manifests.iter().map(|m| m.count(status)).sum()
    }

    /// Returns the total number of dependencies with updates
    pub fn total_updates(&self) -> usize {
        self.manifests.iter().map(|m| m.update_count()).sum()
    }

    /// Returns the total number of security-flagged dependencies
    pub fn total_security(&self) -> usize {
        self.manifests
            .iter()
            .flat_map(|m| &m.reports)
            .filter(|r| r.security_patch)
            .count()
    }

    /// Returns the total number of failed evaluations
    pub fn total_errors(&self) -> usize {
        self.manifests.iter().map(|m| m.error_count()).sum()
    }

    /// Returns manifests of a specific kind
    pub fn by_kind(&self, kind: ManifestKind) -> impl Iterator<Item = &ManifestAudit> {
        self.manifests.iter().filter(move |m| m.kind == kind)
    }
}
