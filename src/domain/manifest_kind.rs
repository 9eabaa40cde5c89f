//! Supported manifest formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Manifest formats understood by the auditor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
    /// Erlang rebar3 build config (rebar.config), git-tag dependencies
    RebarConfig,
    /// npm package manifest (package.json)
    PackageJson,
    /// Plain text list of `owner/repo version` lines
    RepoList,
}

impl ManifestKind {
    /// File names looked up during directory detection
    pub fn detect_filenames(&self) -> &'static [&'static str] {
        match self {
            ManifestKind::RebarConfig => &["rebar.config"],
            ManifestKind::PackageJson => &["package.json"],
            ManifestKind::RepoList => &["input.txt", "repos.txt"],
        }
    }

    /// Classify an explicitly given manifest path by its file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        match name {
            "rebar.config" => Some(ManifestKind::RebarConfig),
            "package.json" => Some(ManifestKind::PackageJson),
            _ if name.ends_with(".txt") => Some(ManifestKind::RepoList),
            _ => None,
        }
    }

    /// Default report file name, written next to the manifest
    pub fn report_filename(&self) -> &'static str {
        match self {
            ManifestKind::RebarConfig | ManifestKind::PackageJson => "report.md",
            ManifestKind::RepoList => "output.md",
        }
    }

    /// Short identifier, used to disambiguate report names
    pub fn slug(&self) -> &'static str {
        match self {
            ManifestKind::RebarConfig => "rebar",
            ManifestKind::PackageJson => "npm",
            ManifestKind::RepoList => "repos",
        }
    }

    /// Heading of the markdown report
    pub fn report_title(&self) -> &'static str {
        match self {
            ManifestKind::RebarConfig => "Erlang Dependency Update Audit",
            ManifestKind::PackageJson => "Frontend Dependency Update Report",
            ManifestKind::RepoList => "GitHub Dependency Update Report",
        }
    }

    /// Returns the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ManifestKind::RebarConfig => "rebar.config",
            ManifestKind::PackageJson => "package.json",
            ManifestKind::RepoList => "repository list",
        }
    }

    /// Returns all supported kinds
    pub fn all() -> &'static [ManifestKind] {
        &[
            ManifestKind::RebarConfig,
            ManifestKind::PackageJson,
            ManifestKind::RepoList,
        ]
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(
            ManifestKind::from_path(&PathBuf::from("backend/rebar.config")),
            Some(ManifestKind::RebarConfig)
        );
        assert_eq!(
            ManifestKind::from_path(&PathBuf::from("frontend/package.json")),
            Some(ManifestKind::PackageJson)
        );
        assert_eq!(
            ManifestKind::from_path(&PathBuf::from("deps.txt")),
            Some(ManifestKind::RepoList)
        );
        assert_eq!(ManifestKind::from_path(&PathBuf::from("Cargo.toml")), None);
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(ManifestKind::RebarConfig.report_filename(), "report.md");
        assert_eq!(ManifestKind::RepoList.report_filename(), "output.md");
    }

    #[test]
    fn test_all_kinds_have_detect_filenames() {
        for kind in ManifestKind::all() {
            assert!(!kind.detect_filenames().is_empty());
            for name in kind.detect_filenames() {
                assert_eq!(ManifestKind::from_path(Path::new(name)), Some(*kind));
            }
        }
    }

    #[test]
    fn test_serde_kind() {
        let json = serde_json::to_string(&ManifestKind::PackageJson).unwrap();
        assert_eq!(json, "\"package_json\"");
    }
}
