//! Manifest file detection
//!
//! Features:
//! - Classifies an explicitly given file by name
//! - Detects rebar.config, package.json and repository lists in a directory
//! - Looks one level down, so `backend/` and `frontend/` of a project are found
//!   from its root (hidden directories and node_modules are skipped)

use crate::domain::ManifestKind;
use crate::error::{AppError, IoError, ManifestError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories never searched for manifests
const SKIPPED_DIRS: &[&str] = &["node_modules", "_build", "target"];

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Format of the manifest
    pub kind: ManifestKind,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Directory containing the manifest
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Detect the manifests to audit under `path`
///
/// A file is classified by its name. A directory is searched in itself and
/// in its immediate subdirectories, in sorted order.
pub fn detect_manifests(path: &Path) -> Result<Vec<ManifestInfo>, AppError> {
    if path.is_file() {
        let kind = ManifestKind::from_path(path).ok_or_else(|| ManifestError::unsupported(path))?;
        return Ok(vec![ManifestInfo::new(path, kind)]);
    }

    if !path.is_dir() {
        return Err(IoError::directory_not_found(path).into());
    }

    let mut manifests = detect_in_dir(path);

    for subdir in subdirectories(path) {
        manifests.extend(detect_in_dir(&subdir));
    }

    debug!("detected {} manifest(s) under {}", manifests.len(), path.display());
    Ok(manifests)
}

fn detect_in_dir(dir: &Path) -> Vec<ManifestInfo> {
    let mut manifests = Vec::new();

    for kind in ManifestKind::all() {
        for name in kind.detect_filenames() {
            let candidate = dir.join(name);
            if candidate.is_file() {
                manifests.push(ManifestInfo::new(candidate, *kind));
            }
        }
    }

    manifests
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.starts_with('.') && !SKIPPED_DIRS.contains(&n))
                .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn test_detect_package_json() {
        let dir = create_temp_dir();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let manifests = detect_manifests(dir.path()).unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].kind, ManifestKind::PackageJson);
        assert_eq!(manifests[0].directory(), dir.path());
    }

    #[test]
    fn test_detect_project_layout() {
        let dir = create_temp_dir();
        fs::write(dir.path().join("input.txt"), "").unwrap();
        fs::create_dir(dir.path().join("backend")).unwrap();
        fs::write(dir.path().join("backend").join("rebar.config"), "").unwrap();
        fs::create_dir(dir.path().join("frontend")).unwrap();
        fs::write(dir.path().join("frontend").join("package.json"), "{}").unwrap();

        let manifests = detect_manifests(dir.path()).unwrap();
        let kinds: Vec<_> = manifests.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ManifestKind::RepoList,
                ManifestKind::RebarConfig,
                ManifestKind::PackageJson
            ]
        );
    }

    #[test]
    fn test_detect_skips_hidden_and_node_modules() {
        let dir = create_temp_dir();
        fs::create_dir_all(dir.path().join("node_modules").join("x")).unwrap();
        fs::write(dir.path().join("node_modules").join("package.json"), "{}").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("input.txt"), "").unwrap();

        let manifests = detect_manifests(dir.path()).unwrap();
        assert!(manifests.is_empty());
    }

    #[test]
    fn test_detect_only_one_level_deep() {
        let dir = create_temp_dir();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("package.json"), "{}").unwrap();

        assert!(detect_manifests(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_detect_explicit_file() {
        let dir = create_temp_dir();
        let path = dir.path().join("deps.txt");
        fs::write(&path, "").unwrap();

        let manifests = detect_manifests(&path).unwrap();
        assert_eq!(manifests, vec![ManifestInfo::new(&path, ManifestKind::RepoList)]);
    }

    #[test]
    fn test_detect_unsupported_file() {
        let dir = create_temp_dir();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "").unwrap();

        let err = detect_manifests(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported manifest format"));
    }

    #[test]
    fn test_detect_missing_path() {
        let dir = create_temp_dir();
        let err = detect_manifests(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("directory not found"));
    }

    #[test]
    fn test_detect_empty_directory() {
        let dir = create_temp_dir();
        assert!(detect_manifests(dir.path()).unwrap().is_empty());
    }
}
