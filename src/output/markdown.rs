//! Markdown report rendering
//!
//! One report per manifest: a title, the project line when known, a short
//! legend and one table row per dependency.

use crate::domain::{DependencyReport, ManifestAudit, ABSENT};

const LEGEND: &str = "> **Note:** 'Update Recommended' means updating is advised, unless a security patch is explicitly noted. Deprecated dependencies point at archived or deprecated upstreams.";

const TABLE_HEADER: &str = "| # | Dependency | Status | Current | Latest | Changelog | Source |\n\
| :---: | :--- | :---: | :---: | :---: | :--- | :--- |\n";

/// Escape text for use inside a markdown table cell
///
/// Pipes are escaped and line breaks are folded into spaces.
pub fn escape_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// Renders a manifest audit as a markdown document
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Render the full report for one manifest
    pub fn render(audit: &ManifestAudit) -> String {
        let mut out = String::new();

        out.push_str(&format!("# 📈 {}\n\n", audit.kind.report_title()));
        if let Some(project) = &audit.project {
            match &project.version {
                Some(version) => out.push_str(&format!(
                    "## Project: **{}** (`{}`)\n\n",
                    project.name, version
                )),
                None => out.push_str(&format!("## Project: **{}**\n\n", project.name)),
            }
        }
        out.push_str(&format!(
            "This report compares the versions declared in `{}` against their latest upstream releases.\n\n",
            audit.path.display()
        ));
        out.push_str(LEGEND);
        out.push_str("\n\n---\n\n");
        out.push_str(&format!(
            "**{}** dependencies audited, **{}** with a newer version, **{}** failed.\n\n",
            audit.reports.len(),
            audit.update_count(),
            audit.error_count()
        ));

        if audit.reports.is_empty() {
            out.push_str("_No dependencies to audit._\n");
            return out;
        }

        out.push_str(TABLE_HEADER);
        for (index, report) in audit.reports.iter().enumerate() {
            out.push_str(&Self::render_row(index + 1, report));
        }

        out
    }

    /// Render a single table row
    pub fn render_row(index: usize, report: &DependencyReport) -> String {
        format!(
            "| {} | **{}** | {} | `{}` | {} | {} | {} |\n",
            index,
            escape_cell(&report.name),
            Self::status_cell(report),
            escape_cell(&report.current_version),
            Self::latest_cell(report),
            Self::changelog_cell(report),
            Self::source_cell(report),
        )
    }

    fn status_cell(report: &DependencyReport) -> String {
        let badge = format!("**{}**", report.status.badge());
        match (&report.message, report.is_error()) {
            (Some(message), true) => format!("{}: {}", badge, escape_cell(message)),
            _ => badge,
        }
    }

    fn latest_cell(report: &DependencyReport) -> String {
        match (&report.latest_version, &report.source_link) {
            (Some(latest), Some(link)) => format!("[`{}`]({})", escape_cell(latest), link),
            (Some(latest), None) => format!("`{}`", escape_cell(latest)),
            (None, _) => ABSENT.to_string(),
        }
    }

    // Excerpts are escaped when they are extracted.
    fn changelog_cell(report: &DependencyReport) -> String {
        match (&report.changelog, &report.message) {
            (Some(excerpt), _) => excerpt.clone(),
            (None, Some(message)) if !report.is_error() => {
                format!("{} ({})", ABSENT, escape_cell(message))
            }
            (None, _) => ABSENT.to_string(),
        }
    }

    fn source_cell(report: &DependencyReport) -> String {
        match &report.repo {
            Some(repo) => format!("[{}]({})", escape_cell(&repo.slug()), repo.web_url()),
            None => ABSENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditStatus, ManifestKind, ProjectInfo, RepoRef};

    fn security_report() -> DependencyReport {
        DependencyReport {
            name: "acme/widget".to_string(),
            current_version: "1.2.0".to_string(),
            latest_version: Some("1.3.0".to_string()),
            update_needed: true,
            security_patch: true,
            archived: false,
            status: AuditStatus::SecurityUrgent,
            changelog: Some("Security fix for a \\| pipe".to_string()),
            source_link: Some("https://github.com/acme/widget/releases/tag/v1.3.0".to_string()),
            repo: Some(RepoRef::new("acme", "widget")),
            message: None,
        }
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line\nbreak\r\nhere"), "line break here");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn test_render_row_links_latest() {
        let row = MarkdownRenderer::render_row(1, &security_report());
        assert!(row.starts_with("| 1 | **acme/widget** |"));
        assert!(row.contains("🚨 URGENT Update Required (Security Patch!)"));
        assert!(row.contains("[`1.3.0`](https://github.com/acme/widget/releases/tag/v1.3.0)"));
        assert!(row.contains("[acme/widget](https://github.com/acme/widget)"));
        // the excerpt keeps its escape and is not escaped twice
        assert!(row.contains("Security fix for a \\| pipe"));
        assert!(!row.contains("\\\\|"));
    }

    #[test]
    fn test_render_error_row_appends_message() {
        let report = DependencyReport::error("jose", "main", "invalid current version 'main'");
        let row = MarkdownRenderer::render_row(2, &report);
        assert!(row.contains("**❌ Error**: invalid current version 'main'"));
        assert!(row.contains("`main`"));
        assert!(row.ends_with("| N/A | N/A | N/A |\n"));
    }

    #[test]
    fn test_render_error_message_is_escaped() {
        let report = DependencyReport::error("x", "1.0.0", "bad | worse");
        let row = MarkdownRenderer::render_row(1, &report);
        assert!(row.contains("bad \\| worse"));
    }

    #[test]
    fn test_render_changelog_note() {
        let mut report = security_report();
        report.status = AuditStatus::UpdateRecommendedChangelogUnavailable;
        report.security_patch = false;
        report.changelog = None;
        report.message = Some("repository link missing".to_string());
        let row = MarkdownRenderer::render_row(1, &report);
        assert!(row.contains("N/A (repository link missing)"));
    }

    #[test]
    fn test_render_document() {
        let mut audit = ManifestAudit::new("frontend/package.json", ManifestKind::PackageJson)
            .with_project(Some(ProjectInfo {
                name: "web".to_string(),
                version: Some("0.1.0".to_string()),
            }));
        audit.add_report(security_report());

        let doc = MarkdownRenderer::render(&audit);
        assert!(doc.starts_with("# 📈 Frontend Dependency Update Report\n"));
        assert!(doc.contains("## Project: **web** (`0.1.0`)"));
        assert!(doc.contains("`frontend/package.json`"));
        assert!(doc.contains("| # | Dependency | Status | Current | Latest | Changelog | Source |"));
        assert!(doc.contains("**1** dependencies audited, **1** with a newer version"));
    }

    #[test]
    fn test_render_header_layout() {
        let audit = ManifestAudit::new("input.txt", ManifestKind::RepoList).with_project(Some(
            ProjectInfo {
                name: "tools".to_string(),
                version: None,
            },
        ));

        let doc = MarkdownRenderer::render(&audit);
        let expected = format!(
            "# 📈 {}\n\n## Project: **tools**\n\nThis report compares the versions declared in `input.txt` against their latest upstream releases.\n\n{}\n\n---\n\n**0** dependencies audited, **0** with a newer version, **0** failed.\n\n_No dependencies to audit._\n",
            ManifestKind::RepoList.report_title(),
            LEGEND
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_render_empty_manifest() {
        let audit = ManifestAudit::new("rebar.config", ManifestKind::RebarConfig);
        let doc = MarkdownRenderer::render(&audit);
        assert!(doc.contains("Erlang Dependency Update Audit"));
        assert!(doc.contains("_No dependencies to audit._"));
        assert!(!doc.contains("| # |"));
    }
}
