//! Normalized, comparable version values
//!
//! Every version that takes part in a comparison goes through
//! [`NormalizedVersion::parse`] first:
//! - `^1.2.3`, `~1.2.3`, `>=1.2.3`, `= 1.2.3` lose their range operators
//! - `v1.2.3` and `1.2.3` both become `v1.2.3`
//! - branch names and commit hashes are kept but marked invalid

use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Prefix carried by every canonical version string
pub const CANONICAL_PREFIX: char = 'v';

/// Characters stripped from the front of a raw version
const RANGE_CHARS: &[char] = &['^', '~', '=', '<', '>', ' ', '\t'];

/// Result of comparing two normalized versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrdering {
    Less,
    Equal,
    Greater,
    /// At least one side is not a semantic version
    Incomparable,
}

impl From<Ordering> for VersionOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => VersionOrdering::Less,
            Ordering::Equal => VersionOrdering::Equal,
            Ordering::Greater => VersionOrdering::Greater,
        }
    }
}

/// A version string in canonical `v`-prefixed form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    canonical: String,
    parsed: Option<Version>,
}

impl NormalizedVersion {
    /// Normalize an arbitrary version string. Never fails: unparseable input
    /// yields an invalid value.
    pub fn parse(raw: &str) -> Self {
        let stripped = raw.trim().trim_start_matches(RANGE_CHARS);
        let stripped = stripped
            .strip_prefix(['v', 'V'])
            .unwrap_or(stripped)
            .trim();

        Self {
            canonical: format!("{}{}", CANONICAL_PREFIX, stripped),
            parsed: Version::parse(stripped).ok(),
        }
    }

    /// Normalize a release or tag name, dropping a monorepo package prefix
    /// such as `@scope/pkg@1.2.3` or `pkg@1.2.3`.
    pub fn from_tag(tag: &str) -> Self {
        let version = tag.rsplit('@').next().unwrap_or(tag);
        Self::parse(version)
    }

    /// Returns true if the version parsed as `MAJOR.MINOR.PATCH[-pre][+build]`
    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }

    /// Canonical form, e.g. `v1.2.3`
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Display form without the canonical prefix, e.g. `1.2.3`
    pub fn display(&self) -> &str {
        &self.canonical[CANONICAL_PREFIX.len_utf8()..]
    }

    /// Parsed semantic version, if valid
    pub fn version(&self) -> Option<&Version> {
        self.parsed.as_ref()
    }

    /// Compare by semver precedence, ignoring build metadata.
    pub fn compare(&self, other: &NormalizedVersion) -> VersionOrdering {
        match (&self.parsed, &other.parsed) {
            (Some(a), Some(b)) => precedence(a, b).into(),
            _ => VersionOrdering::Incomparable,
        }
    }

    /// Returns true if `other` is strictly newer than `self`
    pub fn is_older_than(&self, other: &NormalizedVersion) -> bool {
        self.compare(other) == VersionOrdering::Less
    }
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

/// Pick the greatest valid version among tag names. The first tag wins when
/// two tags normalize to equal versions.
pub fn greatest_tag<'a, I>(tags: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, NormalizedVersion)> = None;

    for tag in tags {
        let candidate = NormalizedVersion::from_tag(tag);
        if !candidate.is_valid() {
            continue;
        }
        let replace = match &best {
            Some((_, current)) => current.compare(&candidate) == VersionOrdering::Less,
            None => true,
        };
        if replace {
            best = Some((tag, candidate));
        }
    }

    best.map(|(tag, _)| tag)
}
