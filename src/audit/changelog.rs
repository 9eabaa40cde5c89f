//! Release-note inspection
//!
//! Decides whether release notes mention a security fix and produces a short
//! single-line excerpt that is safe to place in a markdown table cell.

use crate::registry::Release;
use regex::Regex;
use std::sync::LazyLock;

/// Keywords that flag a release as security-relevant (matched case-insensitively)
pub const SECURITY_KEYWORDS: &[&str] = &["security", "vulnerability", "cve", "patch"];

/// Maximum excerpt length in characters, before the ellipsis
pub const EXCERPT_LIMIT: usize = 80;

const ELLIPSIS: &str = "...";

/// Markdown punctuation removed from excerpts
static MARKDOWN_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*#\[\]()`]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// What a single release contributes to a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogExtract {
    /// Bounded excerpt of the release notes
    pub excerpt: Option<String>,
    /// Title or notes mention a security keyword
    pub security: bool,
}

/// Returns true if the text mentions any security keyword
pub fn is_security_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    SECURITY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Inspect one release: security check on title and notes, excerpt of the notes
pub fn extract(release: &Release) -> ChangelogExtract {
    let title = release.title.as_deref().unwrap_or_default();
    let body = release.body.as_deref().unwrap_or_default();

    ChangelogExtract {
        excerpt: excerpt(body),
        security: is_security_related(&format!("{} {}", title, body)),
    }
}

/// Single-line excerpt of release notes.
///
/// Markdown punctuation is removed, whitespace collapsed and `|` escaped.
/// The result holds at most [`EXCERPT_LIMIT`] characters plus `...` when cut;
/// an escape is never split. Returns `None` when nothing readable is left.
pub fn excerpt(body: &str) -> Option<String> {
    let stripped = MARKDOWN_CHARS.replace_all(body, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let text = collapsed.trim();
    if text.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(EXCERPT_LIMIT + ELLIPSIS.len());
    let mut used = 0;
    let mut truncated = false;

    for c in text.chars() {
        let width = if c == '|' { 2 } else { 1 };
        if used + width > EXCERPT_LIMIT {
            truncated = true;
            break;
        }
        if c == '|' {
            out.push('\\');
        }
        out.push(c);
        used += width;
    }

    if truncated {
        out.truncate(out.trim_end().len());
        out.push_str(ELLIPSIS);
    }

    Some(out)
}
