//! Repository list loader
//!
//! One `owner/repo version` pair per line; blank lines and `#` comments are
//! ignored. Every entry is resolved on GitHub.

use crate::domain::{DependencyEntry, ManifestKind, RepoRef};
use crate::error::ManifestError;
use crate::manifest::{LoadedManifest, ManifestLoader};

/// Loader for plain-text repository lists
pub struct RepoListLoader;

impl ManifestLoader for RepoListLoader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::RepoList
    }

    fn load(&self, content: &str) -> Result<LoadedManifest, ManifestError> {
        let mut loaded = LoadedManifest::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_line(line) {
                Some(entry) => loaded.entries.push(entry),
                None => loaded
                    .skipped
                    .push(format!("line {}: malformed entry '{}'", index + 1, line)),
            }
        }

        Ok(loaded)
    }
}

fn parse_line(line: &str) -> Option<DependencyEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [slug, version] = parts.as_slice() else {
        return None;
    };

    let (owner, repo) = slug.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    let repo = RepoRef::new(owner, repo);
    Some(DependencyEntry::new(repo.slug(), *version).with_source(repo.web_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> LoadedManifest {
        RepoListLoader.load(content).unwrap()
    }

    #[test]
    fn test_load_entries() {
        let loaded = load("acme/widget v1.2.0\nrust-lang/regex 1.10.0\n");

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].name, "acme/widget");
        assert_eq!(loaded.entries[0].version, "v1.2.0");
        assert_eq!(
            loaded.entries[0].source_url.as_deref(),
            Some("https://github.com/acme/widget")
        );
        assert_eq!(loaded.entries[1].version, "1.10.0");
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines_and_comments() {
        let loaded = load("# pinned repos\n\n   acme/widget   v1.2.0  \n");
        assert_eq!(loaded.entries.len(), 1);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_reports_malformed_lines() {
        let loaded = load("acme/widget\nwidget v1.0.0\nacme/widget/extra v1\nacme/ok v2.0.0\n");

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].name, "acme/ok");
        assert_eq!(loaded.skipped.len(), 3);
        assert!(loaded.skipped[0].starts_with("line 1:"));
    }

    #[test]
    fn test_load_empty() {
        let loaded = load("");
        assert!(loaded.entries.is_empty());
    }
}
