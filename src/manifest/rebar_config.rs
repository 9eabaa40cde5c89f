//! rebar.config loader for Erlang projects
//!
//! Handles git dependencies pinned to a tag:
//! - `{name, {git, "url", {tag, "1.0.0"}}}`
//! - `{name, "req", {git, "url", {tag, "1.0.0"}}}`
//! - entries wrapped in `if_var_true` / `if_version_above` / `if_rebar3`
//!
//! Hex packages and git dependencies tracking a branch or ref have no
//! comparable version and are reported as skipped.

use crate::domain::{DependencyEntry, ManifestKind};
use crate::error::ManifestError;
use crate::manifest::{LoadedManifest, ManifestLoader};
use regex::Regex;
use std::sync::LazyLock;

/// The top-level `{deps, [...]}` term
static DEPS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\s*deps\s*,\s*\[(.*?)\]\s*\}").unwrap());

/// Conditional wrappers, removed so the wrapped dependency matches directly
static WRAPPERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\s*if_var_true\s*,\s*\w+\s*,|\{\s*if_version_above\s*,\s*"[^"]*"\s*,|\bif_not_rebar3\b|\bif_rebar3\b"#,
    )
    .unwrap()
});

static TAG_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\s*tag\s*:\s*").unwrap());

/// `{name, ["req",] {git, "url", {tag, "version"}}`
static TAGGED_GIT_DEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\s*([\w@-]+)\s*,\s*(?:"[^"]*"\s*,\s*)?\{\s*git\s*,\s*"([^"]+)"\s*,\s*\{\s*tag\s*,\s*"([^"]+)"\s*\}\s*\}"#,
    )
    .unwrap()
});

/// `{name, ["req",] {git, "url", {branch|ref, "..."}}`
static UNPINNED_GIT_DEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\s*([\w@-]+)\s*,\s*(?:"[^"]*"\s*,\s*)?\{\s*git\s*,\s*"[^"]+"\s*,\s*\{\s*(branch|ref)\s*,"#,
    )
    .unwrap()
});

/// Loader for rebar.config files
pub struct RebarConfigLoader;

impl ManifestLoader for RebarConfigLoader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::RebarConfig
    }

    fn load(&self, content: &str) -> Result<LoadedManifest, ManifestError> {
        let kind = self.kind().display_name();
        let content = strip_comments(content);

        let block = DEPS_BLOCK
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| ManifestError::parse_error(kind, "could not find {deps, [...]} block"))?
            .as_str();

        let cleaned = WRAPPERS.replace_all(block, "");
        let cleaned = TAG_COLON.replace_all(&cleaned, "{tag, ");

        let entries: Vec<DependencyEntry> = TAGGED_GIT_DEP
            .captures_iter(&cleaned)
            .map(|caps| DependencyEntry::new(&caps[1], &caps[3]).with_source(&caps[2]))
            .collect();

        if entries.is_empty() {
            return Err(ManifestError::parse_error(
                kind,
                "no git dependencies pinned to a tag",
            ));
        }

        let skipped = UNPINNED_GIT_DEP
            .captures_iter(&cleaned)
            .map(|caps| format!("{} (tracks a git {})", &caps[1], &caps[2]))
            .collect();

        Ok(LoadedManifest {
            entries,
            project: None,
            skipped,
        })
    }
}

/// Remove `%` comments, leaving `%` inside strings alone
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());

    for line in content.lines() {
        let mut in_string = false;
        let mut escaped = false;
        let mut end = line.len();

        for (i, c) in line.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '%' if !in_string => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }

        out.push_str(&line[..end]);
        out.push('\n');
    }

    out
}
