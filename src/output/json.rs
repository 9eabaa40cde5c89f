//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of audit results
//! - Structured manifest-by-manifest report information

use crate::domain::{AuditStatus, AuditSummary, DependencyReport, ManifestAudit, ProjectInfo};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Summary statistics
    summary: JsonSummary,
    /// Per-manifest results
    manifests: Vec<JsonManifest<'a>>,
    /// Markdown reports written
    reports: Vec<String>,
    /// Declarations that were not audited
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    manifests: usize,
    dependencies: usize,
    updates: usize,
    security: usize,
    errors: usize,
    /// Count per status (verbose only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_status: Vec<JsonStatusCount>,
}

#[derive(Serialize)]
struct JsonStatusCount {
    status: AuditStatus,
    count: usize,
}

/// JSON representation of a manifest result
#[derive(Serialize)]
struct JsonManifest<'a> {
    path: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a ProjectInfo>,
    dependencies: Vec<&'a DependencyReport>,
}

impl JsonFormatter {
    fn summary_to_json(&self, summary: &AuditSummary) -> JsonSummary {
        let by_status = if self.verbosity == Verbosity::Verbose {
            AuditStatus::all()
                .iter()
                .map(|status| JsonStatusCount {
                    status: *status,
                    count: summary.count(*status),
                })
                .filter(|c| c.count > 0)
                .collect()
        } else {
            Vec::new()
        };

        JsonSummary {
            manifests: summary.manifests_processed(),
            dependencies: summary.total_dependencies(),
            updates: summary.total_updates(),
            security: summary.total_security(),
            errors: summary.total_errors(),
            by_status,
        }
    }

    /// Convert manifest result to JSON representation
    ///
    /// Dependencies that need no attention are listed in verbose mode only.
    fn manifest_to_json<'a>(&self, manifest: &'a ManifestAudit) -> JsonManifest<'a> {
        let dependencies = manifest
            .reports
            .iter()
            .filter(|r| {
                self.verbosity == Verbosity::Verbose
                    || r.status != AuditStatus::UpToDate
            })
            .collect();

        JsonManifest {
            path: manifest.path.display().to_string(),
            kind: manifest.kind.slug(),
            project: manifest.project.as_ref(),
            dependencies,
        }
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            summary: self.summary_to_json(&result.summary),
            manifests: result
                .summary
                .manifests
                .iter()
                .map(|m| self.manifest_to_json(m))
                .collect(),
            reports: result
                .written_reports
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            warnings: result.warnings.clone(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        Self::write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &AuditSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(&self.summary_to_json(summary), writer)
    }

    fn format_manifest(
        &self,
        manifest: &ManifestAudit,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(&self.manifest_to_json(manifest), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManifestKind, RepoRef};
    use crate::orchestrator::OrchestratorError;
    use std::path::PathBuf;

    fn create_test_result() -> OrchestratorResult {
        let mut manifest = ManifestAudit::new("package.json", ManifestKind::PackageJson)
            .with_project(Some(ProjectInfo {
                name: "web".to_string(),
                version: None,
            }));

        let mut outdated = DependencyReport::error("lodash", "4.17.20", "unused");
        outdated.message = None;
        outdated.latest_version = Some("4.17.21".to_string());
        outdated.update_needed = true;
        outdated.status = AuditStatus::UpdateRecommended;
        outdated = outdated.with_repo(Some(RepoRef::new("lodash", "lodash")));
        manifest.add_report(outdated);

        let mut current = DependencyReport::error("react", "18.2.0", "unused");
        current.message = None;
        current.latest_version = Some("18.2.0".to_string());
        current.status = AuditStatus::UpToDate;
        manifest.add_report(current);

        let mut summary = AuditSummary::new();
        summary.add_manifest(manifest);

        OrchestratorResult {
            summary,
            written_reports: vec![PathBuf::from("report.md")],
            warnings: Vec::new(),
            errors: vec![OrchestratorError::ReportWriteError {
                path: "other/report.md".to_string(),
                message: "permission denied".to_string(),
            }],
        }
    }

    fn render(verbosity: Verbosity) -> serde_json::Value {
        let mut output = Vec::new();
        JsonFormatter::new(verbosity)
            .format(&create_test_result(), &mut output)
            .unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_format_normal() {
        let json = render(Verbosity::Normal);

        assert_eq!(json["summary"]["dependencies"], 2);
        assert_eq!(json["summary"]["updates"], 1);
        assert!(json["summary"].get("by_status").is_none());

        let manifest = &json["manifests"][0];
        assert_eq!(manifest["kind"], "npm");
        assert_eq!(manifest["project"]["name"], "web");
        let deps = manifest["dependencies"].as_array().unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0]["name"], "lodash");
        assert_eq!(deps[0]["status"], "update_recommended");
        assert_eq!(deps[0]["repo"]["owner"], "lodash");

        assert_eq!(json["reports"][0], "report.md");
        assert!(json.get("warnings").is_none());
        assert_eq!(
            json["errors"][0],
            "Failed to write other/report.md: permission denied"
        );
    }

    #[test]
    fn test_json_format_verbose() {
        let json = render(Verbosity::Verbose);

        let deps = json["manifests"][0]["dependencies"].as_array().unwrap();
        assert_eq!(deps.len(), 2);

        let by_status = json["summary"]["by_status"].as_array().unwrap();
        assert_eq!(by_status.len(), 2);
        assert_eq!(by_status[0]["status"], "update_recommended");
        assert_eq!(by_status[0]["count"], 1);
    }

    #[test]
    fn test_json_format_summary() {
        let mut output = Vec::new();
        JsonFormatter::new(Verbosity::Normal)
            .format_summary(&create_test_result().summary, &mut output)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["manifests"], 1);
        assert_eq!(json["errors"], 0);
    }

    #[test]
    fn test_json_format_manifest() {
        let result = create_test_result();
        let mut output = Vec::new();
        JsonFormatter::new(Verbosity::Verbose)
            .format_manifest(&result.summary.manifests[0], &mut output)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["path"], "package.json");
        assert_eq!(json["dependencies"][1]["name"], "react");
    }
}
