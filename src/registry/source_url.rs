//! Source URL parsing
//!
//! Turns the many spellings of a repository URL found in manifests and
//! registry metadata into an owner/repo reference:
//! - `https://github.com/owner/repo(.git)`
//! - `git+https://…`, `git+ssh://git@…`, `git://…`, `ssh://…`
//! - scp-style `git@github.com:owner/repo.git`
//! - npm shorthands `github:owner/repo` and bare `owner/repo`

use crate::domain::RepoRef;

/// Scheme prefixes stripped before splitting the path (first match only)
const SCHEME_PREFIXES: &[&str] = &[
    "git+https://",
    "git+http://",
    "git+ssh://",
    "git://",
    "ssh://",
    "https://",
    "http://",
];

/// Hosts whose URLs carry the host as the first path segment
const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com"];

/// Extract owner and repo from a source URL.
///
/// Returns `None` when fewer than two path segments remain, or when a
/// known host is not followed by both owner and repo.
pub fn parse_repo_url(url: &str) -> Option<RepoRef> {
    let mut rest = url.trim();
    if let Some(stripped) = SCHEME_PREFIXES.iter().find_map(|p| rest.strip_prefix(p)) {
        rest = stripped;
    }
    rest = rest.strip_prefix("git@").unwrap_or(rest);
    rest = rest.split('#').next().unwrap_or(rest);
    rest = rest.trim_end_matches('/');
    rest = rest.strip_suffix(".git").unwrap_or(rest);

    // scp-style `host:owner/repo` and shorthand `provider:owner/repo`
    let (prefix, path) = match rest.split_once(':') {
        Some((prefix, path)) => (Some(prefix), path),
        None => (None, rest),
    };

    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    // `host:443/owner/repo` leaves the port in front
    if prefix.is_some() && segments.first().is_some_and(|s| is_port(s)) {
        segments.remove(0);
    }

    match segments.as_slice() {
        [first, owner, repo, ..] if known_host(first).is_some() => {
            let host = known_host(first)?;
            Some(build(owner, repo).with_host(host))
        }
        [first, ..] if known_host(first).is_some() => None,
        [owner, repo, ..] => {
            let repo_ref = build(owner, repo);
            match prefix.and_then(known_host) {
                Some(host) => Some(repo_ref.with_host(host)),
                None => Some(repo_ref),
            }
        }
        _ => None,
    }
}

fn build(owner: &str, repo: &str) -> RepoRef {
    RepoRef::new(owner, repo.strip_suffix(".git").unwrap_or(repo))
}

/// Map a host segment or shorthand provider to a known host
fn known_host(segment: &str) -> Option<&'static str> {
    let segment = segment.to_ascii_lowercase();
    KNOWN_HOSTS.iter().copied().find(|host| {
        segment.contains(host) || host.strip_suffix(".com") == Some(segment.as_str())
    })
}

fn is_port(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}
