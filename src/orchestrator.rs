//! Audit orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: detect → load → filter → evaluate → report
//! - Upstream selection per manifest kind (GitHub or npm)
//! - Package filter application
//! - Error handling with partial continuation

use crate::audit::{AuditFilter, ReconciliationEngine};
use crate::cli::CliArgs;
use crate::config::AuditConfig;
use crate::domain::{AuditSummary, ManifestAudit, ManifestKind};
use crate::manifest::{detect_manifests, load_manifest, ManifestInfo};
use crate::output::MarkdownRenderer;
use crate::progress::Progress;
use crate::registry::{GitHubSource, HttpClient, NpmRegistrySource, DEFAULT_USER_AGENT};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Orchestrator for coordinating the audit workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Audit settings (upstream URLs, limits)
    config: AuditConfig,
    /// HTTP client shared by all upstream adapters
    client: HttpClient,
    /// GitHub token, if one is configured
    token: Option<String>,
}

/// Result of running the orchestrator
#[derive(Debug, Default)]
pub struct OrchestratorResult {
    /// Audit summary with all reports
    pub summary: AuditSummary,
    /// Markdown reports written
    pub written_reports: Vec<PathBuf>,
    /// Declarations that were not audited
    pub warnings: Vec<String>,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if a manifest or report failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to detect manifests
    ManifestDetectionError(String),
    /// Options cannot be applied to the detected manifests
    InvalidOptions(String),
    /// Failed to load manifest
    ManifestLoadError { path: String, message: String },
    /// Failed to write a report
    ReportWriteError { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::ManifestDetectionError(msg) => {
                write!(f, "Manifest detection error: {}", msg)
            }
            OrchestratorError::InvalidOptions(msg) => write!(f, "Invalid options: {}", msg),
            OrchestratorError::ManifestLoadError { path, message } => {
                write!(f, "Failed to load {}: {}", path, message)
            }
            OrchestratorError::ReportWriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments and settings
    pub fn new(args: CliArgs, config: AuditConfig) -> Result<Self, OrchestratorError> {
        let client = HttpClient::with_config(config.timeout(), DEFAULT_USER_AGENT)
            .map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?;
        Ok(Self::with_client(args, config, client))
    }

    /// Create an orchestrator with a custom HTTP client (for testing)
    pub fn with_client(args: CliArgs, config: AuditConfig, client: HttpClient) -> Self {
        let token = config.github_token();
        Self {
            args,
            config,
            client,
            token,
        }
    }

    /// Run the audit workflow
    pub async fn run(&self) -> Result<OrchestratorResult, OrchestratorError> {
        self.run_with_progress(self.args.show_progress()).await
    }

    /// Run the audit workflow with optional progress display
    ///
    /// Detection failures and unusable options abort the run; everything
    /// after that is collected in the result.
    pub async fn run_with_progress(
        &self,
        show_progress: bool,
    ) -> Result<OrchestratorResult, OrchestratorError> {
        let mut progress = Progress::new(show_progress);
        let mut result = OrchestratorResult::default();

        // Step 1: Detect manifest files
        let manifests = detect_manifests(&self.args.path)
            .map_err(|e| OrchestratorError::ManifestDetectionError(e.to_string()))?;
        if self.args.output.is_some() && manifests.len() > 1 {
            return Err(OrchestratorError::InvalidOptions(format!(
                "--output needs a single manifest, found {}",
                manifests.len()
            )));
        }
        if manifests.is_empty() {
            warn!("no manifest found under {}", self.args.path.display());
            return Ok(result);
        }

        let filter = self.build_filter();
        let report_paths = self.report_paths(&manifests);

        for (info, report_path) in manifests.iter().zip(report_paths) {
            // Step 2: Load dependency entries
            let loaded = match load_manifest(&info.path, info.kind) {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!("{}: {}", info.path.display(), e);
                    result.errors.push(OrchestratorError::ManifestLoadError {
                        path: info.path.display().to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            for skipped in &loaded.skipped {
                debug!("{}: skipped {}", info.path.display(), skipped);
                result
                    .warnings
                    .push(format!("{}: skipped {}", info.path.display(), skipped));
            }

            // Step 3: Filter and evaluate
            let entries = filter.apply(loaded.entries);
            let engine = self.engine_for(info.kind);
            let mut audit = ManifestAudit::new(&info.path, info.kind).with_project(loaded.project);

            progress.start_manifest(info.kind.display_name(), entries.len());
            for entry in &entries {
                progress.auditing(&entry.name);
                let report = engine.evaluate(entry).await;
                debug!("{}", report);
                audit.add_report(report);
                progress.inc();
            }
            progress.finish_manifest();

            info!(
                "{}: {} dependencies audited via {}, {} need an update",
                info.path.display(),
                audit.reports.len(),
                engine.upstream_name(),
                audit.update_count()
            );

            // Step 4: Write the markdown report
            if let Some(path) = report_path {
                match write_report(&path, &audit) {
                    Ok(()) => result.written_reports.push(path),
                    Err(e) => result.errors.push(e),
                }
            }

            result.summary.add_manifest(audit);
        }

        Ok(result)
    }

    /// Build the audit filter from CLI arguments
    fn build_filter(&self) -> AuditFilter {
        AuditFilter::new()
            .with_only(self.args.only.clone())
            .with_exclude(self.args.exclude.clone())
    }

    fn github(&self) -> GitHubSource {
        GitHubSource::with_base_url(self.client.clone(), &self.config.github_api_url)
            .with_token(self.token.clone())
            .with_tag_limit(self.config.tag_limit)
    }

    /// Get the reconciliation engine for a manifest kind
    fn engine_for(&self, kind: ManifestKind) -> ReconciliationEngine {
        let options = self.config.engine_options();
        match kind {
            ManifestKind::RebarConfig | ManifestKind::RepoList => {
                ReconciliationEngine::new(Box::new(self.github()), options)
            }
            ManifestKind::PackageJson => ReconciliationEngine::new(
                Box::new(NpmRegistrySource::with_base_url(
                    self.client.clone(),
                    &self.config.npm_registry_url,
                    self.github(),
                )),
                options,
            ),
        }
    }

    /// Where each manifest's report goes (`None` with `--no-report`)
    fn report_paths(&self, manifests: &[ManifestInfo]) -> Vec<Option<PathBuf>> {
        if self.args.no_report {
            return vec![None; manifests.len()];
        }
        if let (Some(output), [_]) = (&self.args.output, manifests) {
            return vec![Some(output.clone())];
        }
        default_report_paths(manifests).into_iter().map(Some).collect()
    }
}

/// Report next to each manifest. Manifests sharing a directory and a default
/// name get the kind slug appended, or the manifest's file stem when they are
/// also of the same kind
fn default_report_paths(manifests: &[ManifestInfo]) -> Vec<PathBuf> {
    let plain: Vec<PathBuf> = manifests
        .iter()
        .map(|m| m.directory().join(m.kind.report_filename()))
        .collect();

    manifests
        .iter()
        .zip(&plain)
        .map(|(info, path)| {
            let sharing: Vec<&ManifestInfo> = manifests
                .iter()
                .zip(&plain)
                .filter(|(_, other)| *other == path)
                .map(|(m, _)| m)
                .collect();
            if sharing.len() < 2 {
                return path.clone();
            }
            let same_kind = sharing.iter().filter(|m| m.kind == info.kind).count() > 1;
            if same_kind {
                let stem = info
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(info.kind.slug());
                suffixed(path, stem)
            } else {
                suffixed(path, info.kind.slug())
            }
        })
        .collect()
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext),
        None => format!("{}-{}", stem, suffix),
    };
    path.with_file_name(name)
}

fn write_report(path: &Path, audit: &ManifestAudit) -> Result<(), OrchestratorError> {
    std::fs::write(path, MarkdownRenderer::render(audit)).map_err(|e| {
        OrchestratorError::ReportWriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;
    info!("report written to {}", path.display());
    Ok(())
}
