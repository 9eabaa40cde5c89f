//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-manifest listing of dependencies that need attention, with colors
//! - Status-specific coloring (deprecated, security, update, error)
//! - Skipped declarations and written reports
//! - Summary with a breakdown by status

use crate::domain::{AuditStatus, AuditSummary, DependencyReport, ManifestAudit};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Minimum width of the name column
const MIN_NAME_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Status label, colored by severity
    fn status_label(&self, status: AuditStatus) -> String {
        let label = status.label();
        if !self.color {
            return label.to_string();
        }
        match status {
            AuditStatus::DeprecatedUpdateNeeded
            | AuditStatus::DeprecatedUpToDate
            | AuditStatus::SecurityUrgent => label.red().bold().to_string(),
            AuditStatus::UpdateRecommendedChangelogUnavailable
            | AuditStatus::UpdateRecommended => label.yellow().to_string(),
            AuditStatus::UpToDate => label.green().to_string(),
            AuditStatus::Error => label.red().to_string(),
        }
    }

    /// Reports shown for a manifest at the current verbosity
    fn visible_reports<'a>(&self, manifest: &'a ManifestAudit) -> Vec<&'a DependencyReport> {
        manifest
            .reports
            .iter()
            .filter(|r| {
                self.verbosity == Verbosity::Verbose || r.update_needed || r.archived || r.is_error()
            })
            .collect()
    }

    /// Format a single dependency line
    fn format_report_line(
        &self,
        report: &DependencyReport,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let status = self.status_label(report.status);

        if self.color {
            let name_display = format!("{:width$}", report.name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} [{}]",
                name_display,
                report.current_version.dimmed(),
                "→".dimmed(),
                report.latest_display().bright_white().bold(),
                status
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]",
                report.name,
                report.current_version,
                report.latest_display(),
                status,
                width = max_name_len
            )?;
        }

        if let Some(message) = &report.message {
            if self.color {
                writeln!(writer, "      {}", message.dimmed())?;
            } else {
                writeln!(writer, "      {}", message)?;
            }
        }

        if self.verbosity == Verbosity::Verbose {
            if let Some(excerpt) = &report.changelog {
                writeln!(writer, "      {}", excerpt)?;
            }
        }

        Ok(())
    }

    fn format_list(
        &self,
        title: &str,
        items: &[String],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}:", title.bold())?;
        } else {
            writeln!(writer, "{}:", title)?;
        }
        for item in items {
            writeln!(writer, "  - {}", item)?;
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        for manifest in &result.summary.manifests {
            self.format_manifest(manifest, writer)?;
        }

        if self.verbosity == Verbosity::Verbose && !result.warnings.is_empty() {
            self.format_list("Skipped", &result.warnings, writer)?;
        }

        if !result.written_reports.is_empty() {
            let paths: Vec<String> = result
                .written_reports
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            self.format_list("Reports", &paths, writer)?;
        }

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &AuditSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let total = summary.total_dependencies();
        let updates = summary.total_updates();
        let errors = summary.total_errors();

        if self.verbosity == Verbosity::Quiet {
            if self.color {
                writeln!(
                    writer,
                    "{} audited, {} outdated, {} failed",
                    total,
                    updates.to_string().yellow(),
                    errors.to_string().red()
                )?;
            } else {
                writeln!(writer, "{} audited, {} outdated, {} failed", total, updates, errors)?;
            }
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}:", "Summary".bold())?;
        } else {
            writeln!(writer, "Summary:")?;
        }
        writeln!(
            writer,
            "  {} manifest(s), {} dependencies audited",
            summary.manifests_processed(),
            total
        )?;

        for status in AuditStatus::all() {
            let count = summary.count(*status);
            if count > 0 {
                writeln!(writer, "  {:>4} {}", count, self.status_label(*status))?;
            }
        }

        if total == 0 {
            if self.color {
                writeln!(writer, "  {}", "Nothing to audit".dimmed())?;
            } else {
                writeln!(writer, "  Nothing to audit")?;
            }
        }

        Ok(())
    }

    fn format_manifest(
        &self,
        manifest: &ManifestAudit,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let visible = self.visible_reports(manifest);
        let path_display = manifest.path.display().to_string();
        let count = manifest.reports.len();
        let updates = manifest.update_count();

        if self.color {
            write!(writer, "{}", path_display.bold())?;
            write!(
                writer,
                " {}",
                format!("({})", manifest.kind.display_name()).dimmed()
            )?;
            writeln!(
                writer,
                " — {} audited, {} outdated",
                count,
                updates.to_string().yellow()
            )?;
        } else {
            writeln!(
                writer,
                "{} ({}) — {} audited, {} outdated",
                path_display,
                manifest.kind.display_name(),
                count,
                updates
            )?;
        }

        if visible.is_empty() {
            if self.color {
                writeln!(writer, "  {}", "All dependencies up to date".green())?;
            } else {
                writeln!(writer, "  All dependencies up to date")?;
            }
        } else {
            let max_name_len = visible
                .iter()
                .map(|r| r.name.len())
                .max()
                .unwrap_or(0)
                .max(MIN_NAME_WIDTH);
            for report in visible {
                self.format_report_line(report, max_name_len, writer)?;
            }
        }

        writeln!(writer)
    }
}
