//! package.json loader for Node.js projects
//!
//! Handles the `dependencies` object. Local and VCS references
//! (`file:`, `link:`, `workspace:`, git and http URLs) are skipped.

use crate::domain::{DependencyEntry, ManifestKind, ProjectInfo};
use crate::error::ManifestError;
use crate::manifest::{LoadedManifest, ManifestLoader};
use serde_json::Value;

/// Version prefixes that point at local code instead of a registry release
const LOCAL_PREFIXES: &[&str] = &["file:", "link:", "workspace:"];

/// Loader for package.json files
pub struct PackageJsonLoader;

impl ManifestLoader for PackageJsonLoader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PackageJson
    }

    fn load(&self, content: &str) -> Result<LoadedManifest, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::parse_error(self.kind().display_name(), e.to_string()))?;

        let project = json
            .get("name")
            .and_then(Value::as_str)
            .map(|name| ProjectInfo {
                name: name.to_string(),
                version: json
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });

        let mut loaded = LoadedManifest {
            project,
            ..LoadedManifest::default()
        };

        let Some(deps) = json.get("dependencies").and_then(Value::as_object) else {
            return Ok(loaded);
        };

        let mut names: Vec<&String> = deps.keys().collect();
        names.sort();

        for name in names {
            match deps[name].as_str() {
                Some(version) if is_registry_version(version) => {
                    loaded.entries.push(DependencyEntry::new(name, version));
                }
                Some(version) => loaded.skipped.push(format!("{} ({})", name, version)),
                None => loaded
                    .skipped
                    .push(format!("{} (version is not a string)", name)),
            }
        }

        Ok(loaded)
    }
}

/// Returns true if the value refers to a registry release
fn is_registry_version(version: &str) -> bool {
    let version = version.trim();
    !LOCAL_PREFIXES.iter().any(|p| version.starts_with(p))
        && !version.contains("git")
        && !version.contains("http")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<LoadedManifest, ManifestError> {
        PackageJsonLoader.load(content)
    }

    #[test]
    fn test_load_simple_dependencies() {
        let content = r#"{
            "name": "web",
            "version": "0.1.0",
            "dependencies": {
                "react": "^18.2.0",
                "lodash": "4.17.21"
            },
            "devDependencies": {
                "typescript": "^5.0.0"
            }
        }"#;

        let loaded = load(content).unwrap();

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0], DependencyEntry::new("lodash", "4.17.21"));
        assert_eq!(loaded.entries[1], DependencyEntry::new("react", "^18.2.0"));
        assert!(loaded.entries.iter().all(|e| e.source_url.is_none()));

        let project = loaded.project.unwrap();
        assert_eq!(project.name, "web");
        assert_eq!(project.version.as_deref(), Some("0.1.0"));
    }

    #[test]
    fn test_load_scoped_package() {
        let content = r#"{"dependencies": {"@types/node": "^20.0.0"}}"#;
        let loaded = load(content).unwrap();
        assert_eq!(loaded.entries[0].name, "@types/node");
        assert!(loaded.project.is_none());
    }

    #[test]
    fn test_load_skips_local_and_vcs_references() {
        let content = r#"{
            "dependencies": {
                "local-lib": "file:../lib",
                "linked": "link:../linked",
                "shared": "workspace:*",
                "forked": "git+https://github.com/acme/forked.git",
                "tarball": "https://example.com/pkg.tgz",
                "odd": 42,
                "axios": "~1.6.0"
            }
        }"#;

        let loaded = load(content).unwrap();

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].name, "axios");
        assert_eq!(loaded.skipped.len(), 6);
        assert!(loaded
            .skipped
            .contains(&"local-lib (file:../lib)".to_string()));
        assert!(loaded
            .skipped
            .contains(&"odd (version is not a string)".to_string()));
    }

    #[test]
    fn test_load_without_dependencies() {
        let loaded = load(r#"{"name": "empty"}"#).unwrap();
        assert!(loaded.entries.is_empty());
        assert_eq!(loaded.project.unwrap().name, "empty");
    }

    #[test]
    fn test_load_invalid_json() {
        let err = load("{ not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse package.json"));
    }
}
