//! Dependency reconciliation
//!
//! This module contains:
//! - ReconciliationEngine: compares one declared dependency with its upstream
//! - Release-note inspection (security keywords, excerpts)
//! - AuditFilter: only/exclude selection of entries

pub mod changelog;
mod filter;

pub use changelog::{excerpt, extract, is_security_related, ChangelogExtract};
pub use filter::AuditFilter;

use crate::domain::{
    AuditStatus, DependencyEntry, DependencyReport, NormalizedVersion, RepoRef, VersionOrdering,
};
use crate::error::AuditError;
use crate::registry::{Release, UpstreamResolver, UpstreamVersionInfo};
use tracing::{debug, warn};

/// Default number of releases listed when looking for release notes
pub const DEFAULT_RELEASE_LIMIT: usize = 30;

/// Message recorded when an update exists but no repository is known
const MISSING_REPO_MESSAGE: &str = "repository link missing";

/// Engine options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Releases listed per dependency
    pub release_limit: usize,
    /// Query repository metadata for the archived flag
    pub check_archived: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            release_limit: DEFAULT_RELEASE_LIMIT,
            check_archived: true,
        }
    }
}

/// What the release listing contributed
#[derive(Debug, Default)]
struct ReleaseScan {
    security: bool,
    excerpt: Option<String>,
    newest_tag: Option<String>,
}

/// Reconciles declared versions against one upstream
pub struct ReconciliationEngine {
    resolver: Box<dyn UpstreamResolver>,
    options: EngineOptions,
}

impl ReconciliationEngine {
    /// Create an engine over a resolver
    pub fn new(resolver: Box<dyn UpstreamResolver>, options: EngineOptions) -> Self {
        Self { resolver, options }
    }

    /// Upstream the engine consults
    pub fn upstream_name(&self) -> &'static str {
        self.resolver.upstream_name()
    }

    /// Engine options
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Evaluate one dependency. Failures are recorded on the report, never
    /// returned.
    pub async fn evaluate(&self, entry: &DependencyEntry) -> DependencyReport {
        let current = NormalizedVersion::parse(&entry.version);
        if !current.is_valid() {
            let err = AuditError::invalid_version(&entry.version);
            warn!("{}: {}", entry.name, err);
            return DependencyReport::error(&entry.name, &entry.version, err.to_string());
        }

        let info = match self.resolver.resolve_latest(entry).await {
            Ok(info) => info,
            Err(err) => {
                warn!("{}: {}", entry.name, err);
                return DependencyReport::error(&entry.name, current.display(), err.to_string());
            }
        };

        self.reconcile(entry, &current, info).await
    }

    async fn reconcile(
        &self,
        entry: &DependencyEntry,
        current: &NormalizedVersion,
        info: UpstreamVersionInfo,
    ) -> DependencyReport {
        let latest = NormalizedVersion::from_tag(&info.latest);
        let ordering = current.compare(&latest);
        let update_needed = ordering == VersionOrdering::Less;
        debug!(
            "{}: current {} latest {} ({:?})",
            entry.name,
            current,
            info.latest,
            ordering
        );

        let archived = info.deprecated || self.is_archived(info.repo.as_ref()).await;

        let mut message = None;
        let mut scan = ReleaseScan::default();
        let mut changelog_available = true;

        if update_needed {
            match &info.repo {
                None => {
                    changelog_available = false;
                    message = Some(MISSING_REPO_MESSAGE.to_string());
                }
                Some(repo) => match self
                    .resolver
                    .list_releases(repo, self.options.release_limit)
                    .await
                {
                    Ok(mut releases) => {
                        // the listing is bounded; keep the latest release seen during resolution
                        if let Some(release) = &info.release {
                            if !releases.iter().any(|r| r.tag == release.tag) {
                                releases.push(release.clone());
                            }
                        }
                        scan = scan_releases(&releases, current);
                        changelog_available = scan.newest_tag.is_some();
                    }
                    Err(err) => {
                        warn!("{}: release notes unavailable: {}", entry.name, err);
                        changelog_available = false;
                        message = Some(err.to_string());
                    }
                },
            }
        }

        let source_link = match (&info.repo, &scan.newest_tag) {
            (Some(repo), Some(tag)) => Some(repo.release_url(tag)),
            (Some(repo), None) => Some(repo.web_url()),
            (None, _) => None,
        };

        let latest_version = if latest.is_valid() {
            latest.display().to_string()
        } else {
            info.latest.clone()
        };

        DependencyReport {
            name: entry.name.clone(),
            current_version: current.display().to_string(),
            latest_version: Some(latest_version),
            update_needed,
            security_patch: scan.security,
            archived,
            status: AuditStatus::classify(
                update_needed,
                archived,
                scan.security,
                changelog_available,
            ),
            changelog: scan.excerpt,
            source_link,
            repo: info.repo,
            message,
        }
    }

    /// Archived flag of the repository; lookup failures count as not archived
    async fn is_archived(&self, repo: Option<&RepoRef>) -> bool {
        let Some(repo) = repo else {
            return false;
        };
        if !self.options.check_archived {
            return false;
        }

        match self.resolver.repo_metadata(repo).await {
            Ok(meta) => meta.archived,
            Err(err) => {
                warn!("{}: archived check failed: {}", repo, err);
                false
            }
        }
    }
}

/// Inspect every release newer than `current`, pre-releases included. The
/// excerpt comes from the newest of them.
fn scan_releases(releases: &[Release], current: &NormalizedVersion) -> ReleaseScan {
    let mut scan = ReleaseScan::default();
    let mut newest: Option<(NormalizedVersion, &Release)> = None;

    for release in releases {
        let version = NormalizedVersion::from_tag(&release.tag);
        if !current.is_older_than(&version) {
            continue;
        }

        if extract(release).security {
            scan.security = true;
        }

        let replace = match &newest {
            Some((best, _)) => best.is_older_than(&version),
            None => true,
        };
        if replace {
            newest = Some((version, release));
        }
    }

    if let Some((_, release)) = newest {
        scan.excerpt = extract(release).excerpt;
        scan.newest_tag = Some(release.tag.clone());
    }

    scan
}
