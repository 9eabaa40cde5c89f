//! Manifest file detection and loading
//!
//! This module provides functionality to:
//! - Detect manifest files in a directory (and its immediate subdirectories)
//! - Load dependency entries from rebar.config, package.json and repository lists

mod detector;
mod package_json;
mod rebar_config;
mod repo_list;

pub use detector::{detect_manifests, ManifestInfo};
pub use package_json::PackageJsonLoader;
pub use rebar_config::RebarConfigLoader;
pub use repo_list::RepoListLoader;

use crate::domain::{DependencyEntry, ManifestKind, ProjectInfo};
use crate::error::ManifestError;
use std::path::Path;

/// Dependencies read from one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedManifest {
    /// Entries in manifest order
    pub entries: Vec<DependencyEntry>,
    /// Project name/version, when the manifest declares them
    pub project: Option<ProjectInfo>,
    /// Declarations that were not audited, with the reason
    pub skipped: Vec<String>,
}

/// Trait for loading dependency entries from a manifest
pub trait ManifestLoader {
    /// Returns the manifest kind this loader handles
    fn kind(&self) -> ManifestKind;

    /// Extract dependency entries from the manifest content
    fn load(&self, content: &str) -> Result<LoadedManifest, ManifestError>;
}

/// Get a manifest loader for the specified kind
pub fn get_loader(kind: ManifestKind) -> Box<dyn ManifestLoader> {
    match kind {
        ManifestKind::RebarConfig => Box::new(RebarConfigLoader),
        ManifestKind::PackageJson => Box::new(PackageJsonLoader),
        ManifestKind::RepoList => Box::new(RepoListLoader),
    }
}

/// Read and load a manifest file
pub fn load_manifest(path: &Path, kind: ManifestKind) -> Result<LoadedManifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

    get_loader(kind).load(&content)
}
